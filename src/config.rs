// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::{fs, path::Path};

use serde::Deserialize;

/// Settings read from the optional configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path patterns of the templates to index. See [crate::discovery::discover].
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    Format {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_yaml(&content).map_err(|source| ConfigError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Config, serde_yaml::Error> {
        // An empty file deserializes as null.
        let config: Option<Config> = serde_yaml::from_str(content)?;
        Ok(config.unwrap_or_default())
    }
}
