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
pub struct OutputsTemplate {
    #[serde(rename = "Resources", default, deserialize_with = "present")]
    pub resources: Option<Value>,
    #[serde(rename = "Outputs", default)]
    pub outputs: Option<IndexMap<String, Option<OutputDecl>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputDecl {
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
    pub description: Option<Value>,
    pub export: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputRecord {
    pub name: String,
    pub value: Value,
    pub description: Option<Value>,
    pub export: Option<Value>,
    pub start_line: usize,
    pub path: PathBuf,
}

pub fn extract(
    template: OutputsTemplate,
    path: &Path,
    lines: &LineIndex,
    mut emit: impl FnMut(OutputRecord),
) -> Result<()> {
    require_resources(path, matches!(&template.resources, Some(value) if !value.is_null()))?;
    let outputs = template.outputs.unwrap_or_default();

    let mut validated = Vec::with_capacity(outputs.len());
    for (name, decl) in outputs {
        let decl = decl.unwrap_or_default();
        let Some(value) = required(&decl.value).cloned() else {
            return Err(Error::template_format(
                path,
                format!("Every Outputs member must contain a Value object with non-null value. Output: {name}"),
            ));
        };
        validated.push((name, value, decl));
    }

    for (name, value, decl) in validated {
        emit(OutputRecord {
            start_line: member_line(lines, Section::Outputs, &name),
            name,
            value,
            description: decl.description,
            export: decl.export,
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
