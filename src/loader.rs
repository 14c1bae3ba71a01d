// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    ast::Node,
    cow_yaml::from_node,
    error::{Error, Result},
    line_index::LineIndex,
    normalize::normalize,
    parser::parse_yaml_str,
    sections::{
        mapping::{self, MappingRecord},
        output::{self, OutputRecord},
        parameter::{self, ParameterRecord},
        resource::{self, PropertyResolver, ResourceContext, ResourceRecord},
        Record, Section,
    },
    tag_resolver::{resolve_tags, rewrite_condition_tags},
};

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Rewrite `!If`, `!Equals` and `!FindInMap` in the raw text before parsing.
    pub rewrite_condition_tags: bool,
}

/// Reads templates and hands their section members to a callback, one record at a time.
#[derive(Default)]
pub struct TemplateLoader {
    options: LoadOptions,
    resolver: Option<Box<dyn PropertyResolver>>,
}

// One template, parsed both ways.
struct Prepared {
    // Tag-resolved, normalized and encoded as JSON.
    document: Value,
    // Parse tree of the file as written, for line numbers.
    source_tree: Node,
}

impl TemplateLoader {
    pub fn new(options: LoadOptions) -> TemplateLoader {
        TemplateLoader {
            options,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Box<dyn PropertyResolver>) -> TemplateLoader {
        self.resolver = Some(resolver);
        self
    }

    /// Indexes `section` of every file in `paths`.
    ///
    /// A failing file is logged and skipped; the failures are returned once all files were processed.
    pub fn load_paths(&self, paths: &[PathBuf], section: Section, mut emit: impl FnMut(Record)) -> Vec<Error> {
        let mut errors = Vec::new();
        for path in paths {
            if let Err(err) = self.load_file(path, section, &mut emit) {
                tracing::error!(path = %path.display(), section = %section, error = %err, "failed to index template");
                errors.push(err);
            }
        }
        errors
    }

    pub fn load_file(&self, path: &Path, section: Section, emit: impl FnMut(Record)) -> Result<()> {
        let content = read(path)?;
        self.records(path, &content, section, emit)
    }

    /// Indexes `section` of a template that is already in memory. `path` is only used for provenance.
    pub fn records(&self, path: &Path, content: &str, section: Section, mut emit: impl FnMut(Record)) -> Result<()> {
        match section {
            Section::Resources => self.resources(path, content, |record| emit(Record::Resource(record))),
            Section::Parameters => self.parameters(path, content, |record| emit(Record::Parameter(record))),
            Section::Outputs => self.outputs(path, content, |record| emit(Record::Output(record))),
            Section::Mappings => self.mappings(path, content, |record| emit(Record::Mapping(record))),
        }
    }

    pub fn resources(&self, path: &Path, content: &str, emit: impl FnMut(ResourceRecord)) -> Result<()> {
        let prepared = self.prepare(path, content)?;
        let template = decode(path, &prepared.document)?;
        let lines = section_lines(&prepared, Section::Resources);
        let ctx = ResourceContext {
            path,
            content,
            lines: &lines,
            resolver: self.resolver.as_deref(),
        };
        resource::extract(template, &ctx, emit)
    }

    pub fn parameters(&self, path: &Path, content: &str, emit: impl FnMut(ParameterRecord)) -> Result<()> {
        let prepared = self.prepare(path, content)?;
        let template = decode(path, &prepared.document)?;
        let lines = section_lines(&prepared, Section::Parameters);
        parameter::extract(template, path, &lines, emit)
    }

    pub fn outputs(&self, path: &Path, content: &str, emit: impl FnMut(OutputRecord)) -> Result<()> {
        let prepared = self.prepare(path, content)?;
        let template = decode(path, &prepared.document)?;
        let lines = section_lines(&prepared, Section::Outputs);
        output::extract(template, path, &lines, emit)
    }

    pub fn mappings(&self, path: &Path, content: &str, emit: impl FnMut(MappingRecord)) -> Result<()> {
        let prepared = self.prepare(path, content)?;
        let template = decode(path, &prepared.document)?;
        let lines = section_lines(&prepared, Section::Mappings);
        mapping::extract(template, path, &lines, emit)
    }

    fn prepare(&self, path: &Path, content: &str) -> Result<Prepared> {
        tracing::debug!(path = %path.display(), rewrite = self.options.rewrite_condition_tags, "parsing template");

        let rewritten = self.options.rewrite_condition_tags.then(|| rewrite_condition_tags(content));
        let typed_source = rewritten.as_deref().unwrap_or(content);

        let tree = parse(path, typed_source)?;
        let document = from_node(&resolve_tags(&tree));
        let document = normalize(&document).map_err(|err| Error::template_format(path, err.to_string()))?;
        let document = serde_json::to_value(&document).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file, or one holding only comments, is a template without any section.
        let document = match document {
            Value::Null => Value::Object(Default::default()),
            document => document,
        };

        // Line numbers must come from the file as written, not from the rewritten text.
        let source_tree = match rewritten {
            Some(_) => parse(path, content)?,
            None => tree,
        };

        Ok(Prepared { document, source_tree })
    }
}

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse(path: &Path, content: &str) -> Result<Node> {
    parse_yaml_str(content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn decode<T: DeserializeOwned>(path: &Path, document: &Value) -> Result<T> {
    T::deserialize(document).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn section_lines(prepared: &Prepared, section: Section) -> LineIndex {
    LineIndex::build(&prepared.source_tree, section.name(), &section.convention())
}
