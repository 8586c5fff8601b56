//! Minibank CLI - runs a scripted banking session over an in-memory bank
//!
//! Usage:
//! ```bash
//! minibank demo
//! minibank demo --config minibank.toml --format json
//! minibank demo --format csv --out reports/ --delimiter ';'
//! minibank demo --format json --compact
//! RUST_LOG=minibank_core=debug minibank demo
//! minibank config --config minibank.toml
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use minibank_bank::BankConfig;
use minibank_reports::{CsvExporter, JsonExporter, MarkdownExporter, ReportExporter};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Minibank - a small retail bank simulation
#[derive(Parser)]
#[command(name = "minibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scripted session and print the reports
    Demo {
        /// Report format
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        /// Also write each report into this directory
        #[arg(long, short)]
        out: Option<PathBuf>,

        #[command(flatten)]
        export: ExportOptions,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
    Markdown,
}

/// Per-format output switches; each one is ignored by the other formats
#[derive(Args, Debug)]
pub struct ExportOptions {
    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Leave out the CSV header line
    #[arg(long)]
    pub no_header: bool,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Leave out the Markdown summary section
    #[arg(long)]
    pub no_summary: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            no_header: false,
            compact: false,
            no_summary: false,
        }
    }
}

impl ReportFormat {
    pub fn exporter(self, options: &ExportOptions) -> Box<dyn ReportExporter> {
        match self {
            ReportFormat::Csv => {
                let mut csv = CsvExporter::new().with_delimiter(options.delimiter);
                if options.no_header {
                    csv = csv.without_header();
                }
                Box::new(csv)
            }
            ReportFormat::Json if options.compact => Box::new(JsonExporter::new().compact()),
            ReportFormat::Json => Box::new(JsonExporter::new()),
            ReportFormat::Markdown if options.no_summary => {
                Box::new(MarkdownExporter::new().without_summary())
            }
            ReportFormat::Markdown => Box::new(MarkdownExporter::new()),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BankConfig> {
    match path {
        Some(path) => BankConfig::load_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(BankConfig::default()),
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.bank.log_level);

    match cli.command {
        Commands::Demo {
            format,
            out,
            export,
        } => {
            let exporter = format.exporter(&export);
            commands::demo::run(&config, exporter.as_ref(), out.as_deref())?;
        }

        Commands::Config => {
            commands::config::show(&config)?;
        }
    }

    Ok(())
}
