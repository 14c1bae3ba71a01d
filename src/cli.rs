// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! cfn-index cli interface

use std::{fmt::Formatter, path::PathBuf};

use cfn_index::Section;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Template path pattern
    ///
    /// Can be specified multiple times. Supports `~` and glob syntax
    /// (`stacks/**/*.yaml`). Added to the paths of the config file.
    #[clap(short = 'p', long = "path")]
    pub paths: Vec<String>,

    /// Index a single file, without pattern expansion
    #[clap(short = 'f', long = "file", conflicts_with("paths"))]
    pub files: Vec<PathBuf>,

    /// Config file providing `paths`
    #[clap(short = 'c', long = "config", env = "CFN_INDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Template section to index (resources, parameters, outputs or mappings)
    #[arg(short = 's', long = "section", default_value_t = Section::Resources)]
    pub section: Section,

    #[arg(short = 'F', long = "format", default_value_t)]
    pub format: OutputFormat,

    /// Rewrite `!If`, `!Equals` and `!FindInMap` in the raw text before parsing
    #[clap(long = "rewrite-condition-tags")]
    pub rewrite_condition_tags: bool,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// One YAML document per record
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
