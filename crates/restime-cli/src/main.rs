//! restime CLI - Resource Timeline Layout Engine
//!
//! Command-line interface for validating timeline documents and computing
//! their layout.

mod input;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use restime_layout::{LayoutEngine, MonospaceMetrics, TimelineLayout};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::input::TimelineDocument;

#[derive(Parser)]
#[command(name = "restime")]
#[command(author, version, about = "Resource timeline layout engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a timeline document
    Check {
        /// Input file path (.toml or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compute the layout of a timeline document
    Layout {
        /// Input file path (.toml or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Canvas width in pixels (overrides the document)
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height in pixels (overrides the document)
        #[arg(long)]
        height: Option<f64>,

        /// Seed for the stacking tie-break, for reproducible output
        #[arg(long, env = "RESTIME_SEED")]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Check { file } => check(&file),
        Commands::Layout {
            file,
            format,
            output,
            width,
            height,
            seed,
        } => layout(&file, format, output.as_deref(), width, height, seed),
    }
}

fn check(file: &Path) -> Result<()> {
    let document = TimelineDocument::load(file)?;
    let (timeline, config) = document
        .into_timeline()
        .with_context(|| format!("invalid timeline in {}", file.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid layout settings in {}", file.display()))?;

    println!(
        "{}: ok ({} resources, {} allocations, {:.1}h window)",
        file.display(),
        timeline.resources.len(),
        timeline.allocations.len(),
        timeline.range.hours()
    );
    Ok(())
}

fn layout(
    file: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    width: Option<f64>,
    height: Option<f64>,
    seed: Option<u64>,
) -> Result<()> {
    let document = TimelineDocument::load(file)?;
    let (timeline, mut config) = document
        .into_timeline()
        .with_context(|| format!("invalid timeline in {}", file.display()))?;
    if let Some(width) = width {
        config = config.width(width);
    }
    if let Some(height) = height {
        config = config.height(height);
    }

    let engine = LayoutEngine::new(config, MonospaceMetrics::default());
    let layout: TimelineLayout = match seed {
        Some(seed) => engine.layout_with_rng(&timeline, &mut StdRng::seed_from_u64(seed)),
        None => engine.layout(&timeline),
    }
    .context("layout failed")?;
    info!(
        steps = layout.axis.step_count,
        blocks = layout.blocks.len(),
        "computed layout for {}",
        file.display()
    );

    let rendered = match format {
        OutputFormat::Text => report::text_report(&timeline, &layout),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&layout).context("failed to serialize layout")? + "\n"
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
