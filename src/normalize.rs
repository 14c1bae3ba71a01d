// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::rc::Rc;

use hashlink::LinkedHashMap;

use crate::cow_yaml::Yaml;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("mapping key {key} cannot be used as a string")]
pub struct KeyError {
    pub key: String,
}

/// Returns a copy of `yaml` where every mapping key is a string, so the value can be encoded as JSON.
///
/// Scalar keys take their textual form. Sequence and mapping keys are rejected.
pub fn normalize(yaml: &Yaml) -> Result<Yaml, KeyError> {
    match yaml {
        Yaml::Array(values) => {
            let values = values.iter().map(normalize).collect::<Result<Vec<_>, _>>()?;
            Ok(Yaml::Array(Rc::new(values)))
        }
        Yaml::Hash(entries) => {
            let mut normalized = LinkedHashMap::new();
            for (key, value) in entries.iter() {
                normalized.insert(Yaml::String(key_to_string(key)?), normalize(value)?);
            }
            Ok(Yaml::Hash(Rc::new(normalized)))
        }
        Yaml::Real(_) | Yaml::Integer(_) | Yaml::String(_) | Yaml::Boolean(_) | Yaml::Null => Ok(yaml.clone()),
    }
}

fn key_to_string(key: &Yaml) -> Result<Rc<String>, KeyError> {
    match key {
        Yaml::String(value) => Ok(value.clone()),
        Yaml::Real(value) => Ok(value.clone()),
        Yaml::Integer(value) => Ok(Rc::new(value.to_string())),
        Yaml::Boolean(value) => Ok(Rc::new(value.to_string())),
        Yaml::Null => Ok(Rc::new("null".to_string())),
        Yaml::Array(_) | Yaml::Hash(_) => Err(KeyError {
            key: serde_json::to_string(key).unwrap_or_else(|_| format!("{:?}", key)),
        }),
    }
}
