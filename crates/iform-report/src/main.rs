use std::path::Path;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use avx512_iform::{FormConfig, MemoryPolicyKind};
use iform_report::{build_report, render_text, scan_file};

#[derive(Parser, Debug)]
#[command(author, version, about = "Group a disassembly listing by instruction form", long_about = None)]
struct Cli {
    /// Disassembly listing to scan
    #[arg(value_name = "ASMFILE")]
    input: String,
    /// JSON file with `memory` and `span_size` settings
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    /// Memory operand classification policy (overrides config)
    #[arg(long, value_enum)]
    memory: Option<MemoryPolicyKind>,
    /// Lines per span (overrides config)
    #[arg(long)]
    span_size: Option<usize>,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Include every span's lines (text format only)
    #[arg(long)]
    listing: bool,
    /// Write report to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn resolve_config(cli: &Cli) -> Result<FormConfig> {
    let mut cfg = match &cli.config {
        Some(path) => FormConfig::load(Path::new(path))?,
        None => FormConfig::default(),
    };
    if let Some(m) = cli.memory { cfg.memory = m; }
    if let Some(n) = cli.span_size { cfg.span_size = n; }
    anyhow::ensure!(cfg.span_size > 0, "span size must be at least 1");
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;
    let table = scan_file(Path::new(&cli.input), &cfg)?;
    let report = build_report(&table, cfg.span_size)?;

    let buf = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
        OutputFormat::Text => render_text(&report, cli.listing),
    };
    if let Some(path) = cli.out { std::fs::write(path, buf)?; } else { print!("{}", buf); }

    Ok(())
}
