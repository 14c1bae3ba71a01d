// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::path::PathBuf;

use crate::parser::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure while indexing one template file. Every variant names the file it happened in.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to decode file content {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid YAML but not a minimal CloudFormation template.
    #[error(
        "failed to parse AWS CloudFormation template from file {}: Template format error: {reason}",
        .path.display()
    )]
    TemplateFormat { path: PathBuf, reason: String },

    #[error("{reason}: {pattern}")]
    Discovery { pattern: String, reason: String },
}

impl Error {
    pub(crate) fn template_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Error {
        Error::TemplateFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn is_template_format(&self) -> bool {
        matches!(self, Error::TemplateFormat { .. })
    }
}
