// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::rc::Rc;

use hashlink::LinkedHashMap;

use super::Yaml;
use crate::ast::{Node, ScalarNode, ScalarStyle};

/// Converts a parse tree into a [Yaml] value.
///
/// Tags are dropped, so any tag still present (i.e. not rewritten by the tag resolver) has no effect on the value.
pub fn from_node(node: &Node) -> Yaml {
    match node {
        Node::Sequence(seq) => {
            let values = seq.values.iter().map(from_node).collect();
            Yaml::Array(Rc::new(values))
        }
        Node::Map(map) => {
            let mut entries = LinkedHashMap::new();
            for entry in &map.entries {
                // Later duplicate keys win, same as most YAML loaders.
                entries.insert(from_node(&entry.key), from_node(&entry.value));
            }
            Yaml::Hash(Rc::new(entries))
        }
        Node::Scalar(scalar) => from_scalar(scalar),
    }
}

fn from_scalar(scalar: &ScalarNode) -> Yaml {
    // `!!str`, depending on whether the handle was expanded.
    if matches!(scalar.tag.as_deref(), Some("tag:yaml.org,2002:str" | "!!str")) {
        return Yaml::string(scalar.value.clone());
    }

    match scalar.style {
        ScalarStyle::Plain => {
            // Core schema spellings that the saphyr resolver leaves as strings.
            match scalar.value.as_str() {
                "Null" | "NULL" => return Yaml::Null,
                "True" | "TRUE" => return Yaml::Boolean(true),
                "False" | "FALSE" => return Yaml::Boolean(false),
                _ => {}
            }

            let yaml = saphyr::Yaml::from_str(&scalar.value);
            match yaml {
                saphyr::Yaml::Real(value) => Yaml::Real(Rc::new(value)),
                saphyr::Yaml::Integer(value) => Yaml::Integer(value),
                saphyr::Yaml::String(value) => Yaml::string(value),
                saphyr::Yaml::Boolean(value) => Yaml::Boolean(value),
                saphyr::Yaml::Null => Yaml::Null,
                _ => Yaml::string(scalar.value.clone()),
            }
        }
        ScalarStyle::Quoted => Yaml::string(scalar.value.clone()),
    }
}
