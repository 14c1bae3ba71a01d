// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

mod cli;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use cfn_index::{config::Config, discovery::discover, LoadOptions, Record, TemplateLoader};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CFN_INDEX_LOG"))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("{failed} template(s) could not be indexed");
            std::process::exit(1);
        }
        Err(e) => {
            for error in e.chain() {
                eprintln!("{error}")
            }
            std::process::exit(1);
        }
    }
}

/// Indexes every selected template and returns how many of them failed.
fn run(cli: cli::Cli) -> anyhow::Result<usize> {
    let files = template_files(&cli)?;
    tracing::info!(files = files.len(), section = %cli.section, "indexing templates");

    let loader = TemplateLoader::new(LoadOptions {
        rewrite_condition_tags: cli.rewrite_condition_tags,
    });

    let mut out = BufWriter::new(io::stdout().lock());
    let mut write_result = Ok(());
    let errors = loader.load_paths(&files, cli.section, |record| {
        if write_result.is_ok() {
            write_result = write_record(&mut out, &cli.format, &record);
        }
    });
    write_result?;
    out.flush()?;

    let failed = errors.len();
    for err in errors {
        eprintln!("{:#}", anyhow::Error::from(err));
    }
    Ok(failed)
}

fn template_files(cli: &cli::Cli) -> anyhow::Result<Vec<PathBuf>> {
    if !cli.files.is_empty() {
        return Ok(cli.files.clone());
    }

    let mut patterns = match &cli.config {
        Some(path) => Config::load(path)?.paths,
        None => Vec::new(),
    };
    patterns.extend(cli.paths.iter().cloned());
    anyhow::ensure!(!patterns.is_empty(), "paths must be configured");

    Ok(discover(&patterns)?)
}

fn write_record(out: &mut impl Write, format: &cli::OutputFormat, record: &Record) -> anyhow::Result<()> {
    match format {
        cli::OutputFormat::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        cli::OutputFormat::Yaml => {
            writeln!(out, "---")?;
            serde_yaml::to_writer(&mut *out, record)?;
        }
    }
    Ok(())
}
