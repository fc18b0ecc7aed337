//! Docstring-driven type annotator for Python-style source files.
//!
//! Finds function definitions whose body opens with a structured docstring,
//! infers parameter and return types from the docstring's `Args:`/`Returns:`
//! sections, and splices annotation syntax into the signature. Everything
//! outside a rewritten signature is reproduced byte for byte.
//!
//! Four phases per file:
//!
//! 1. **Match** — scan for `def` blocks followed by a docstring
//! 2. **Parse** — read the argument/return sections into raw types
//! 3. **Map** — normalize raw types through the vocabulary tables
//! 4. **Splice** — rewrite signatures, copying all untouched spans

mod docstring;
mod matcher;
mod signature;
mod splice;
mod vocab;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "annotator",
    about = "Annotate Python signatures with types inferred from docstrings"
)]
struct Cli {
    /// Input file
    #[arg(short = 'i', long = "input-file")]
    input: String,

    /// Output file (defaults to rewriting the input in place)
    #[arg(short = 'o', long = "output-file")]
    output: Option<String>,

    /// JSON file replacing the built-in vocabulary tables
    #[arg(short = 't', long = "tables")]
    tables: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(path) => vocab::TypeTables::from_file(path)?,
        None => vocab::TypeTables::default(),
    };

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input))?;

    let result = splice::annotate_source(&source, &tables)
        .with_context(|| format!("Failed to annotate {}", cli.input))?;

    let output = cli.output.as_deref().unwrap_or(&cli.input);
    fs::write(output, &result).with_context(|| format!("Failed to write {output}"))?;

    Ok(())
}
