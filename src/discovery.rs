// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Turns configured path patterns into the list of template files to index.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expands every pattern and returns the regular files it matches, in pattern order.
///
/// A leading `~` is replaced by the home directory and relative patterns are taken from the current directory.
/// Patterns may use glob syntax, including `**`. Directories and unreadable entries are skipped.
pub fn discover<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let absolute = absolute_pattern(pattern)?;
        let absolute = absolute.to_string_lossy();

        let entries = glob::glob(&absolute).map_err(|err| Error::Discovery {
            pattern: pattern.to_string(),
            reason: format!("invalid glob pattern ({})", err.msg),
        })?;

        let before = files.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => tracing::warn!(pattern, error = %err, "skipping unreadable path"),
            }
        }
        tracing::debug!(pattern, matched = files.len() - before, "expanded path pattern");
    }
    Ok(files)
}

fn absolute_pattern(pattern: &str) -> Result<PathBuf> {
    let expanded = expand_home(pattern)?;
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    let cwd = std::env::current_dir().map_err(|err| Error::Discovery {
        pattern: pattern.to_string(),
        reason: format!("cannot read current directory ({err})"),
    })?;
    Ok(cwd.join(expanded))
}

// Only `~` and `~/...` are expanded. `~user` is taken literally.
fn expand_home(pattern: &str) -> Result<PathBuf> {
    let rest = match pattern.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(pattern)),
    };

    let home = dirs::home_dir().ok_or_else(|| Error::Discovery {
        pattern: pattern.to_string(),
        reason: "cannot determine home directory".to_string(),
    })?;
    Ok(join_non_empty(&home, rest))
}

fn join_non_empty(base: &Path, rest: &str) -> PathBuf {
    if rest.is_empty() {
        base.to_path_buf()
    } else {
        base.join(rest)
    }
}
