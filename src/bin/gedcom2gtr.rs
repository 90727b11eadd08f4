//! gedcom2gtr: render a sandclock chart for one individual of a GEDCOM file.
//!
//! ## Usage
//!
//! ```bash
//! gedcom2gtr family.ged I0006 > tree.graph
//! gedcom2gtr --max-ancestor-generations 3 --dynamic-generation-limits family.ged @I6@
//! ```
//!
//! The output is meant for `\input` inside a `genealogypicture` environment.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: log filter (default `gedcom2gtr=warn`, `-v` raises it to debug)
//! - `LOG_FORMAT`: `json` for structured logs, anything else for plain text
//!
//! Logs go to stderr so stdout carries only the chart.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gedcom2gtr::{build_index, gedcom, render, TreeBuilder, TreeConfig, Xref};

#[derive(Parser)]
#[command(name = "gedcom2gtr")]
#[command(about = "Render a GEDCOM sandclock tree for LaTeX genealogytree", long_about = None)]
#[command(version)]
struct Cli {
    /// GEDCOM file to read
    gedcom_file: PathBuf,

    /// Cross-reference id of the root individual (with or without @)
    xref_id: String,

    /// Leave out the root's siblings
    #[arg(long)]
    no_siblings: bool,

    /// Leave out the siblings of ancestors
    #[arg(long)]
    no_ancestor_siblings: bool,

    /// Generations to show above the root (-1 for unlimited)
    #[arg(long, allow_negative_numbers = true, value_parser = clap::value_parser!(i64).range(-1..))]
    max_ancestor_generations: Option<i64>,

    /// Generations to show below the root (-1 for unlimited)
    #[arg(long, allow_negative_numbers = true, value_parser = clap::value_parser!(i64).range(-1..))]
    max_descendant_generations: Option<i64>,

    /// Give unused generations on one side to the other side
    #[arg(long)]
    dynamic_generation_limits: bool,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the chart here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Configuration file (or defaults) with flags layered on top.
    fn tree_config(&self) -> Result<TreeConfig> {
        let mut config = match &self.config {
            Some(path) => TreeConfig::from_json_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => TreeConfig::default(),
        };

        if self.no_siblings {
            config.include_siblings = false;
        }
        if self.no_ancestor_siblings {
            config.include_ancestor_siblings = false;
        }
        if self.dynamic_generation_limits {
            config.dynamic_generation_limits = true;
        }
        if let Some(limit) = self.max_ancestor_generations {
            config.max_ancestor_generations = limit.try_into()?;
        }
        if let Some(limit) = self.max_descendant_generations {
            config.max_descendant_generations = limit.try_into()?;
        }

        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();

    let default_filter = if verbose { "gedcom2gtr=debug" } else { "gedcom2gtr=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.tree_config()?;
    info!(params_hash = %config.params_hash(), "configuration resolved");

    let records = gedcom::read_file(&cli.gedcom_file)
        .with_context(|| format!("reading {}", cli.gedcom_file.display()))?;
    let graph = build_index(records).context("indexing GEDCOM records")?;

    let root = Xref::new(&cli.xref_id);
    let tree = TreeBuilder::new(&graph, config)
        .build(&root)
        .with_context(|| format!("building tree for {}", cli.xref_id))?;
    info!(
        nodes = tree.len(),
        fingerprint = %tree.fingerprint(),
        "tree built"
    );

    let mut chart = render(&tree);
    chart.push('\n');

    match &cli.output {
        Some(path) => fs::write(path, chart)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(chart.as_bytes()).context("writing to stdout")?;
            stdout.flush().context("writing to stdout")?;
        }
    }

    Ok(())
}
