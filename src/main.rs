// Command-line host - loads a dashboard definition and prints its body
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudwatch_dashboard_body::DashboardCompiler;
use cloudwatch_dashboard_body::infrastructure::config::{compile_definition, load_dashboard_definition};

/// Compile a dashboard definition into a CloudWatch dashboard body
#[derive(Parser)]
#[command(name = "cw-dashboard-body")]
#[command(author, version)]
struct Cli {
    /// Dashboard definition file (TOML, JSON or YAML)
    definition: PathBuf,

    /// Indent the emitted JSON
    #[arg(long)]
    pretty: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the body
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let definition = load_dashboard_definition(&cli.definition)?;
    let compiler = DashboardCompiler::new().pretty(cli.pretty);
    let body = compile_definition(definition, &compiler)
        .with_context(|| format!("failed to compile {}", cli.definition.display()))?;

    println!("{body}");
    Ok(())
}
