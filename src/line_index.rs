// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Recovers the source line of section members from the raw parse tree.

#[cfg(test)]
mod tests;

use crate::ast::{MapNode, Node, SequenceNode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathEntry {
    pub path: String,
    pub start_line: usize,
}

/// What to do with sequences found inside the section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceRule {
    // Record the non-empty sequence under its dotted path and stop there.
    RecordNonEmpty,
    // Record nothing for the sequence, descend into its elements with the index as path segment.
    RecurseIndexed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Convention {
    pub sequences: SequenceRule,
    pub record_scalars: bool,
    // Record mappings below member level under their full dotted path.
    pub nested_mappings: bool,
}

/// Walks `root` and records `(path, line)` entries for the elements of `section`.
///
/// Section members are recorded under their bare name, at the line of their key. Everything else is recorded
/// under the full dotted path starting with the section name.
pub fn index_lines(root: &Node, section: &str, convention: &Convention) -> Vec<PathEntry> {
    walk_section(root, section, convention)
        .into_iter()
        .map(|recorded| recorded.entry)
        .collect()
}

fn walk_section(root: &Node, section: &str, convention: &Convention) -> Vec<Recorded> {
    let mut walker = Walker {
        section,
        convention,
        recorded: Vec::new(),
    };
    let mut path = Vec::new();
    walker.walk(root, &mut path, None);
    walker.recorded
}

// An entry together with the key segments it was found under, section name included.
#[derive(Clone, Debug)]
struct Recorded {
    segments: Vec<String>,
    entry: PathEntry,
}

struct Walker<'a> {
    section: &'a str,
    convention: &'a Convention,
    recorded: Vec<Recorded>,
}

impl Walker<'_> {
    fn walk(&mut self, node: &Node, path: &mut Vec<String>, key_line: Option<usize>) {
        match node {
            Node::Map(map) => self.walk_map(map, path, key_line),
            Node::Sequence(seq) => self.walk_sequence(seq, path),
            Node::Scalar(_) => {
                if self.convention.record_scalars && self.in_section(path) {
                    self.record(path, path.join("."), node.line());
                }
            }
        }
    }

    fn walk_map(&mut self, map: &MapNode, path: &mut Vec<String>, key_line: Option<usize>) {
        let line = key_line.unwrap_or(map.src_loc.line);
        if path.len() == 2 && self.in_section(path) {
            self.record(path, path[1].clone(), line);
        } else if path.len() > 2 && self.convention.nested_mappings && self.in_section(path) {
            self.record(path, path.join("."), line);
        }

        for entry in &map.entries {
            // Complex keys cannot be addressed by a key path.
            let Some(key) = entry.key.key_text() else {
                continue;
            };
            path.push(key.to_string());
            self.walk(&entry.value, path, Some(entry.key.line()));
            path.pop();
        }
    }

    fn walk_sequence(&mut self, seq: &SequenceNode, path: &mut Vec<String>) {
        match self.convention.sequences {
            SequenceRule::RecordNonEmpty => {
                if !seq.values.is_empty() && self.in_section(path) {
                    self.record(path, path.join("."), seq.src_loc.line);
                }
            }
            SequenceRule::RecurseIndexed => {
                for (index, value) in seq.values.iter().enumerate() {
                    path.push(index.to_string());
                    self.walk(value, path, None);
                    path.pop();
                }
            }
        }
    }

    fn in_section(&self, path: &[String]) -> bool {
        path.first().is_some_and(|first| first == self.section)
    }

    // A repeated key replaces everything recorded under its earlier occurrence, the same way the later value wins
    // in the loaded document.
    fn record(&mut self, segments: &[String], path: String, start_line: usize) {
        self.recorded.retain(|recorded| !recorded.segments.starts_with(segments));
        self.recorded.push(Recorded {
            segments: segments.to_vec(),
            entry: PathEntry { path, start_line },
        });
    }
}

/// Lookup over the entries of one section.
///
/// Entries are addressed by their key segments, so neither two leaves with the same name under different parents
/// nor keys that contain dots get mixed up.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    recorded: Vec<Recorded>,
}

impl LineIndex {
    pub fn build(root: &Node, section: &str, convention: &Convention) -> LineIndex {
        LineIndex {
            recorded: walk_section(root, section, convention),
        }
    }

    /// Line of the element found under `section` and then `segments`. A member is addressed by its name alone.
    pub fn line_of(&self, section: &str, segments: &[&str]) -> Option<usize> {
        self.recorded
            .iter()
            .find(|recorded| match recorded.segments.split_first() {
                Some((first, rest)) => first == section && rest.iter().eq(segments.iter().copied()),
                None => false,
            })
            .map(|recorded| recorded.entry.start_line)
    }
}
