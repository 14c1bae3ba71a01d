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

/// Computes the "resolved" view of a resource's properties (conditions and parameters applied).
///
/// The engine itself only supplies the literal properties. A resolver gets the raw template text, so it can
/// reprocess the template with its own schema-aware tooling.
pub trait PropertyResolver {
    fn resolve(&self, path: &Path, content: &str, resource: &str) -> Option<Value>;
}

#[derive(Debug, Deserialize)]
pub struct ResourcesTemplate {
    #[serde(rename = "Resources", default)]
    pub resources: Option<IndexMap<String, Option<ResourceDecl>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceDecl {
    #[serde(default, deserialize_with = "present")]
    pub r#type: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub properties: Option<Value>,
    pub condition: Option<Value>,
    pub creation_policy: Option<Value>,
    pub deletion_policy: Option<Value>,
    pub depends_on: Option<Value>,
    pub metadata: Option<Value>,
    pub update_policy: Option<Value>,
    pub update_replace_policy: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub properties_literal: Option<Value>,
    pub properties_resolved: Option<Value>,
    pub condition: Option<Value>,
    pub creation_policy: Option<Value>,
    pub deletion_policy: Option<Value>,
    pub depends_on: Option<Value>,
    pub metadata: Option<Value>,
    pub update_policy: Option<Value>,
    pub update_replace_policy: Option<Value>,
    pub start_line: usize,
    pub path: PathBuf,
}

/// Input handed to [extract] besides the decoded template.
pub struct ResourceContext<'a> {
    pub path: &'a Path,
    pub content: &'a str,
    pub lines: &'a LineIndex,
    pub resolver: Option<&'a dyn PropertyResolver>,
}

pub fn extract(
    template: ResourcesTemplate,
    ctx: &ResourceContext<'_>,
    mut emit: impl FnMut(ResourceRecord),
) -> Result<()> {
    require_resources(ctx.path, template.resources.is_some())?;
    let resources = template.resources.unwrap_or_default();

    let mut validated = Vec::with_capacity(resources.len());
    for (name, decl) in resources {
        let decl = decl.unwrap_or_default();
        let resource_type = validate(ctx.path, &name, &decl)?;
        validated.push((name, resource_type, decl));
    }

    for (name, resource_type, decl) in validated {
        let properties_resolved = ctx
            .resolver
            .and_then(|resolver| resolver.resolve(ctx.path, ctx.content, &name));

        emit(ResourceRecord {
            start_line: member_line(ctx.lines, Section::Resources, &name),
            name,
            resource_type,
            properties_literal: decl.properties,
            properties_resolved,
            condition: decl.condition,
            creation_policy: decl.creation_policy,
            deletion_policy: decl.deletion_policy,
            depends_on: decl.depends_on,
            metadata: decl.metadata,
            update_policy: decl.update_policy,
            update_replace_policy: decl.update_replace_policy,
            path: ctx.path.to_path_buf(),
        });
    }

    Ok(())
}

fn validate(path: &Path, name: &str, decl: &ResourceDecl) -> Result<String> {
    let Some(resource_type) = required(&decl.r#type) else {
        return Err(Error::template_format(
            path,
            format!("Every Resources object must contain a Type member. Resource: {name}"),
        ));
    };
    let Some(resource_type) = resource_type.as_str() else {
        return Err(Error::template_format(
            path,
            format!("Type member must be a string. Resource: {name}"),
        ));
    };

    if matches!(decl.properties, Some(Value::Null)) {
        return Err(Error::template_format(
            path,
            format!("[/Resources/{name}/Properties] 'null' values are not allowed in templates"),
        ));
    }

    Ok(resource_type.to_string())
}
