// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! One extractor per template section.
//!
//! Every extractor gets the tag-resolved, normalized document decoded into its own typed shape, plus the
//! [LineIndex] built for its section from the unresolved parse tree. Members are validated before the first record
//! is emitted, so a malformed member never leaves a half-emitted file behind.

pub mod mapping;
pub mod output;
pub mod parameter;
pub mod resource;

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    line_index::{Convention, LineIndex, SequenceRule},
};

pub use mapping::MappingRecord;
pub use output::OutputRecord;
pub use parameter::ParameterRecord;
pub use resource::{PropertyResolver, ResourceRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Resources,
    Parameters,
    Outputs,
    Mappings,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Resources, Section::Parameters, Section::Outputs, Section::Mappings];

    /// Top-level template key.
    pub fn name(self) -> &'static str {
        match self {
            Section::Resources => "Resources",
            Section::Parameters => "Parameters",
            Section::Outputs => "Outputs",
            Section::Mappings => "Mappings",
        }
    }

    pub fn convention(self) -> Convention {
        match self {
            Section::Resources | Section::Parameters => Convention {
                sequences: SequenceRule::RecurseIndexed,
                record_scalars: false,
                nested_mappings: false,
            },
            Section::Outputs => Convention {
                sequences: SequenceRule::RecordNonEmpty,
                record_scalars: true,
                nested_mappings: false,
            },
            // Mapping records are correlated on `map.key`, which sits below member level.
            Section::Mappings => Convention {
                sequences: SequenceRule::RecordNonEmpty,
                record_scalars: true,
                nested_mappings: true,
            },
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown section {s:?}"))
    }
}

/// A record of any section.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Resource(ResourceRecord),
    Parameter(ParameterRecord),
    Output(OutputRecord),
    Mapping(MappingRecord),
}

/// Keeps an explicit `null` apart from a missing key: missing is `None`, `null` is `Some(Value::Null)`.
///
/// Use together with `#[serde(default)]`.
pub(crate) fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Every template needs a non-null `Resources` section, whichever section is being read.
pub(crate) fn require_resources(path: &Path, present: bool) -> Result<()> {
    if present {
        return Ok(());
    }
    Err(Error::template_format(
        path,
        "At least one Resources member must be defined",
    ))
}

/// Start line of a member, or 0 if the index has no entry for it.
pub(crate) fn member_line(lines: &LineIndex, section: Section, name: &str) -> usize {
    lines.line_of(section.name(), &[name]).unwrap_or_else(|| {
        tracing::warn!(section = %section, member = name, "no start line recorded");
        0
    })
}

/// Required attribute of a member: present, and not `null`.
pub(crate) fn required<'a>(value: &'a Option<Value>) -> Option<&'a Value> {
    value.as_ref().filter(|value| !value.is_null())
}
