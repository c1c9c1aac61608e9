use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ezsql::compiler::{CompiledSql, SqlCompiler};
use ezsql::metadata::{EntityMeta, Resolver};
use ezsql::query::QueryDescriptor;
use ezsql::EzConfig;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ezsql-explain")]
#[command(about = "Prints the SQL ezsql compiles for a query descriptor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the data query
    Select(Inputs),
    /// Compile the matching COUNT(*) query
    Count(Inputs),
}

#[derive(clap::Args)]
struct Inputs {
    /// EzConfig as JSON; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Entity metadata as JSON
    #[arg(long)]
    entity: PathBuf,
    /// Query descriptor as JSON; an empty query when omitted
    #[arg(long)]
    query: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (inputs, count) = match cli.command {
        Command::Select(inputs) => (inputs, false),
        Command::Count(inputs) => (inputs, true),
    };

    let config = match &inputs.config {
        Some(path) => EzConfig::from_json(&read(path)?)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => EzConfig::default(),
    };
    let meta: EntityMeta = parse_json(&inputs.entity)?;
    let query: QueryDescriptor = match &inputs.query {
        Some(path) => parse_json(path)?,
        None => QueryDescriptor::default(),
    };

    let resolver = Resolver::new(Arc::new(config));
    let entity = resolver.resolve_meta(&meta)?;
    let compiler = SqlCompiler::new(&resolver);
    let compiled = if count {
        compiler.compile_count(&query, &entity)?
    } else {
        compiler.compile_select(&query, &entity)?
    };

    print(&compiled, inputs.format)
}

fn print(compiled: &CompiledSql, format: Format) -> Result<()> {
    match format {
        Format::Text => {
            println!("{}", compiled.sql);
            for (idx, param) in compiled.params.iter().enumerate() {
                println!("  ?{} = {}", idx + 1, param);
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(compiled)?),
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read(path)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
