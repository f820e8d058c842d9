//! envdoc — generate environment variable documentation from annotated Go
//! config structs.
//!
//! Scans a directory of Go sources, collects struct types whose fields carry
//! `env` tags, flattens them into a variable tree and renders it. Runs
//! standalone or from a `//go:generate` directive, in which case the GOFILE
//! and GOLINE variables select the type right below the directive.

mod collect;
mod convert;
mod decode;
mod model;
mod parser;
mod render;
mod resolve;
mod tags;

use anyhow::{bail, Context, Result};
use clap::Parser;
use collect::{Collector, Marker};
use convert::Converter;
use decode::{new_decoder, DecoderOpts, Target};
use render::RenderOpts;
use resolve::TypeResolver;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "envdoc",
    about = "Generate environment variable documentation from annotated Go config structs"
)]
struct Cli {
    /// Directory to scan for Go files
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output file path. Writes to stdout if omitted; a directory gets
    /// an envdoc file with the format's extension.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), plaintext, html, dotenv, json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Glob to filter files by base name
    #[arg(long)]
    files: Option<String>,

    /// Glob to filter type declarations by name
    #[arg(long)]
    types: Option<String>,

    /// Document every type in matching files (same as --types '*')
    #[arg(long)]
    all: bool,

    /// Global prefix for all variable names
    #[arg(long, default_value = "")]
    env_prefix: String,

    /// Derive names from field identifiers when no tag is present
    #[arg(long)]
    field_names: bool,

    /// Primary name-tag key
    #[arg(long, default_value = "env")]
    tag_name: String,

    /// Default-value tag key
    #[arg(long, default_value = "envDefault")]
    tag_default: String,

    /// Mark fields without a default value as required
    #[arg(long)]
    required_if_no_def: bool,

    /// Annotation convention to decode
    #[arg(long, value_enum, default_value = "composite")]
    target: Target,

    /// Document title
    #[arg(long, default_value = "Environment Variables")]
    title: String,

    /// Disable inline styles for HTML output
    #[arg(long)]
    no_styles: bool,

    /// Print the collected declaration tree and resolver index to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let type_glob = type_glob_from(cli.all, cli.types.as_deref())?;

    // Without an explicit type selection, a go:generate invocation marks
    // the one type sitting right below the directive comment.
    let marker = match type_glob {
        Some(_) => None,
        None => marker_from_env()?,
    };
    let file_glob = cli
        .files
        .clone()
        .or_else(|| marker.as_ref().map(|m| m.file.clone()));

    let collector = Collector::new(file_glob.as_deref(), type_glob.as_deref(), marker)?;
    let sources = parser::parse_dir(&cli.dir)?;
    let files = collector.collect(sources);
    let resolver = TypeResolver::from_files(&files);

    if cli.debug {
        eprint_files(&files);
        eprintln!("{}", resolver.dump());
    }

    let decoder = new_decoder(
        cli.target,
        DecoderOpts {
            tag_name: cli.tag_name.clone(),
            tag_default: cli.tag_default.clone(),
            required_if_no_def: cli.required_if_no_def,
            use_field_names: cli.field_names,
        },
    );
    let mut converter = Converter::new(decoder, cli.env_prefix.clone());
    let scopes = converter.scopes_from_files(&files, &resolver);

    let renderer = render::create_renderer(
        &cli.format,
        RenderOpts {
            title: cli.title.clone(),
            no_styles: cli.no_styles,
        },
    )?;
    let rendered = renderer.render(&scopes);

    match output_path(cli.output.as_deref(), renderer.file_extension()) {
        Some(path) => fs::write(&path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    for warning in converter.take_warnings() {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn type_glob_from(all: bool, types: Option<&str>) -> Result<Option<String>> {
    if all && types.is_some() {
        bail!("flags --all and --types can't be used together");
    }
    if all {
        return Ok(Some("*".to_string()));
    }
    Ok(types.map(str::to_string))
}

/// go:generate context, if present. GOFILE names the file holding the
/// directive, GOLINE its 1-based line.
fn marker_from_env() -> Result<Option<Marker>> {
    let file = match std::env::var("GOFILE") {
        Ok(f) if !f.is_empty() => f,
        _ => return Ok(None),
    };
    let line = std::env::var("GOLINE")
        .context("GOLINE is not set but GOFILE is")?
        .parse::<usize>()
        .context("invalid GOLINE value")?;
    Ok(Some(Marker { file, line }))
}

/// Resolve the final output target. A directory path gets a default file
/// name with the format's extension; no path at all means stdout.
fn output_path(output: Option<&std::path::Path>, ext: &str) -> Option<PathBuf> {
    let path = output?;
    if path.is_dir() {
        Some(path.join(format!("envdoc.{ext}")))
    } else {
        Some(path.to_path_buf())
    }
}

fn eprint_files(files: &[model::FileSpec]) {
    for f in files {
        eprintln!("{} ({}, export={})", f.name, f.pkg, f.export);
        for t in &f.types {
            eprintln!("  {} (export={}, fields={})", t.name, t.export, t.fields.len());
        }
    }
}
