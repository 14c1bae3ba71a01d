// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{member_line, present, require_resources, required, Section};
use crate::{
    error::{Error, Result},
    line_index::LineIndex,
};

#[derive(Debug, Deserialize)]
pub struct ParametersTemplate {
    #[serde(rename = "Resources", default, deserialize_with = "present")]
    pub resources: Option<Value>,
    #[serde(rename = "Parameters", default)]
    pub parameters: Option<IndexMap<String, Option<ParameterDecl>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterDecl {
    #[serde(default, deserialize_with = "present")]
    pub r#type: Option<Value>,
    pub default: Option<Value>,
    pub max_length: Option<Value>,
    pub min_length: Option<Value>,
    pub max_value: Option<Value>,
    pub min_value: Option<Value>,
    pub no_echo: Option<Value>,
    pub allowed_pattern: Option<Value>,
    pub allowed_values: Option<Value>,
    pub description: Option<Value>,
    pub constraint_description: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub default_value: Option<Value>,
    pub max_length: Option<Value>,
    pub min_length: Option<Value>,
    pub max_value: Option<Value>,
    pub min_value: Option<Value>,
    pub no_echo: Option<Value>,
    pub allowed_pattern: Option<Value>,
    pub allowed_values: Option<Value>,
    pub description: Option<Value>,
    pub constraint_description: Option<Value>,
    pub start_line: usize,
    pub path: PathBuf,
}

pub fn extract(
    template: ParametersTemplate,
    path: &Path,
    lines: &LineIndex,
    mut emit: impl FnMut(ParameterRecord),
) -> Result<()> {
    require_resources(path, matches!(&template.resources, Some(value) if !value.is_null()))?;
    let parameters = template.parameters.unwrap_or_default();

    let mut validated = Vec::with_capacity(parameters.len());
    for (name, decl) in parameters {
        let decl = decl.unwrap_or_default();
        let parameter_type = validate(path, &name, &decl)?;
        validated.push((name, parameter_type, decl));
    }

    for (name, parameter_type, decl) in validated {
        emit(ParameterRecord {
            start_line: member_line(lines, Section::Parameters, &name),
            name,
            parameter_type,
            default_value: decl.default,
            max_length: decl.max_length,
            min_length: decl.min_length,
            max_value: decl.max_value,
            min_value: decl.min_value,
            no_echo: decl.no_echo,
            allowed_pattern: decl.allowed_pattern,
            allowed_values: decl.allowed_values,
            description: decl.description,
            constraint_description: decl.constraint_description,
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

fn validate(path: &Path, name: &str, decl: &ParameterDecl) -> Result<String> {
    let Some(parameter_type) = required(&decl.r#type) else {
        return Err(Error::template_format(
            path,
            format!("Every Parameters object must contain a Type member with non-null value. Parameter: {name}"),
        ));
    };

    // Types are strings in practice; anything else is kept in its JSON form.
    Ok(match parameter_type {
        Value::String(parameter_type) => parameter_type.clone(),
        other => other.to_string(),
    })
}
