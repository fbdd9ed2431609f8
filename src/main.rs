//! Roleflow - state-flow analyzer for declarative task roles.
//!
//! Classifies a role's tasks by lifecycle state and writes a text report
//! and a Graphviz diagram of each state's tasks, variables and includes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roleflow::{App, Config};

/// State-flow analyzer for declarative task roles
#[derive(Parser)]
#[command(name = "roleflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Role directory to analyze
    role_path: PathBuf,

    /// Configuration file (defaults to .roleflow.toml, then the global config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for the analysis echoed to stdout (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    cmd_analyze(&cli.role_path, config, &cli.format)
}

/// Analyze a role and report where the artifacts were written.
fn cmd_analyze(role_path: &std::path::Path, config: Config, format: &str) -> Result<()> {
    match format {
        "text" | "json" => {}
        other => anyhow::bail!("Unsupported output format '{other}' (expected text or json)"),
    }

    println!("Analyzing role at: {}\n", role_path.display());

    let outcome = App::new(role_path, config).run()?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&outcome.analysis)?;
            println!("{json}");
        }
        _ => {
            println!("{}", outcome.report);
        }
    }

    println!("\nText analysis report saved to: {}", outcome.report_path.display());
    println!("Visual analysis saved to: {}", outcome.graph_path.display());

    Ok(())
}
