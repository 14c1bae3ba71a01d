// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Untyped YAML document value with `Rc`-shared children.

mod loader;

use std::rc::Rc;

use hashlink::LinkedHashMap;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize, Serializer,
};

pub use loader::from_node;

#[derive(Clone, PartialEq, PartialOrd, Debug, Eq, Ord, Hash)]
pub enum Yaml {
    // Numbers that don't fit in an i64 (e.g. floating point).
    Real(Rc<String>),
    Integer(i64),
    String(Rc<String>),
    Boolean(bool),
    Array(Rc<Vec<Yaml>>),
    Hash(Rc<LinkedHashMap<Yaml, Yaml>>),
    Null,
}

impl Yaml {
    pub fn string(value: impl Into<String>) -> Yaml {
        Yaml::String(Rc::new(value.into()))
    }
}

impl Serialize for Yaml {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Yaml::Real(value) => match value.parse::<f64>() {
                Ok(real) if real.is_finite() => serializer.serialize_f64(real),
                // .inf, .nan and friends have no JSON form.
                _ => serializer.serialize_str(value),
            },
            Yaml::Integer(value) => serializer.serialize_i64(*value),
            Yaml::String(value) => serializer.serialize_str(value),
            Yaml::Boolean(value) => serializer.serialize_bool(*value),
            Yaml::Array(values) => {
                let mut ser = serializer.serialize_seq(Some(values.len()))?;
                for value in values.iter() {
                    ser.serialize_element(value)?;
                }
                ser.end()
            }
            Yaml::Hash(entries) => {
                let mut ser = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    ser.serialize_entry(key, value)?;
                }
                ser.end()
            }
            Yaml::Null => serializer.serialize_unit(),
        }
    }
}
