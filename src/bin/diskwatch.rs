//! Diskwatch - receive changed-sector notifications.
//!
//! Usage:
//!   diskwatch                          # listen on /var/run/diskwatch
//!   diskwatch --socket /tmp/dw.sock    # listen elsewhere
//!   diskwatch --json                   # JSON line per range on stdout
//!   diskwatch --config diskwatch.toml  # load settings from TOML

use anyhow::{Context, Result};
use clap::Parser;
use diskwatch::config::SOCKET_ENV;
use diskwatch::{
    run_daemon, shutdown_signal, Config, JsonReporter, LogReporter, Overrides, ReportFormat,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diskwatch")]
#[command(about = "Diskwatch - receive changed-sector notifications", long_about = None)]
struct Cli {
    /// Socket path to bind (overrides config and DISKWATCH_SOCKET)
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report ranges as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        socket: cli.socket,
        json: cli.json,
        verbose: cli.verbose,
    };
    let config = Config::layered(cli.config.as_deref(), std::env::var_os(SOCKET_ENV), &overrides)?;

    init_logging(&config.log_level);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let stats = runtime.block_on(async {
        match config.report {
            ReportFormat::Log => run_daemon(&config, &mut LogReporter, shutdown_signal()).await,
            ReportFormat::Json => {
                let mut reporter = JsonReporter::new(std::io::stdout().lock());
                run_daemon(&config, &mut reporter, shutdown_signal()).await
            }
        }
    });
    let stats = stats.with_context(|| format!("listening on {}", config.socket_path.display()))?;

    tracing::debug!(?stats, "exiting");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
