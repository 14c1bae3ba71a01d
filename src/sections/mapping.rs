// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{present, require_resources, Section};
use crate::{error::Result, line_index::LineIndex};

// Map name -> top-level key -> name -> value.
type Mappings = IndexMap<String, IndexMap<String, IndexMap<String, Value>>>;

#[derive(Debug, Deserialize)]
pub struct MappingsTemplate {
    #[serde(rename = "Resources", default, deserialize_with = "present")]
    pub resources: Option<Value>,
    #[serde(rename = "Mappings", default)]
    pub mappings: Option<Mappings>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MappingRecord {
    pub map: String,
    pub key: String,
    pub name: String,
    pub value: Value,
    pub start_line: usize,
    pub path: PathBuf,
}

/// Emits one record per name-value pair, dated to the line of its `map.key` pair.
pub fn extract(
    template: MappingsTemplate,
    path: &Path,
    lines: &LineIndex,
    mut emit: impl FnMut(MappingRecord),
) -> Result<()> {
    require_resources(path, matches!(&template.resources, Some(value) if !value.is_null()))?;

    for (map, keys) in template.mappings.unwrap_or_default() {
        for (key, pairs) in keys {
            let start_line = lines
                .line_of(Section::Mappings.name(), &[&map, &key])
                .unwrap_or_else(|| {
                    tracing::warn!(map = %map, key = %key, "no start line recorded");
                    0
                });

            for (name, value) in pairs {
                emit(MappingRecord {
                    map: map.clone(),
                    key: key.clone(),
                    name,
                    value,
                    start_line,
                    path: path.to_path_buf(),
                });
            }
        }
    }

    Ok(())
}
