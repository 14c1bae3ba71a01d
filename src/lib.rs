// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Indexes AWS CloudFormation templates.
//!
//! A template is parsed twice. The first tree has its short-form intrinsic tags (`!Ref`, `!GetAtt`, ...)
//! rewritten into canonical mappings and is decoded into typed section records. The second tree is the file as
//! written and only provides the line each section member starts on. [loader::TemplateLoader] ties the steps
//! together and hands out one record per section member.

pub mod ast;
pub mod config;
pub mod cow_yaml;
pub mod discovery;
pub mod error;
pub mod intrinsic;
pub mod line_index;
pub mod loader;
pub mod normalize;
pub mod parser;
pub mod sections;
pub mod tag_resolver;

pub use error::{Error, Result};
pub use loader::{LoadOptions, TemplateLoader};
pub use sections::{MappingRecord, OutputRecord, ParameterRecord, PropertyResolver, Record, ResourceRecord, Section};
