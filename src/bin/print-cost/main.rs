use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use print_cost::config::Config;
use tracing_subscriber::prelude::*;

mod cmd_estimate;
mod cmd_interactive;
mod cmd_serve;

/// Price 3D print jobs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "print-cost")]
struct Cli {
    /// Config file to use. Built-in defaults apply if it does not exist.
    #[arg(long, short, default_value = "print-cost.toml", env = "PRINT_COST_CONFIG")]
    config: PathBuf,

    /// verbosity of logging output [trace, debug, info, warn, error]
    #[arg(long, short, default_value = "info")]
    log_level: String,

    /// Log as JSON rather than human readable text.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single job from the command line.
    Estimate(cmd_estimate::EstimateArgs),

    /// Edit a job line by line on stdin, redrawing the breakdown after
    /// each change.
    Interactive {
        /// Draw tables without ANSI colors.
        #[arg(long)]
        no_color: bool,
    },

    /// Serve HTTP requests to price print jobs.
    Serve {
        /// `host:port` to bind to on the host system. Overrides the config
        /// file.
        #[arg(long, short)]
        bind: Option<String>,
    },
}

async fn handle_signals() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(|e| {
            tracing::error!(error = format!("{:?}", e), "Failed to set up SIGINT handler");
            e
        })?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
            tracing::error!(error = format!("{:?}", e), "Failed to set up SIGTERM handler");
            e
        })?;

        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("received SIGINT");
            }
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await.map_err(|e| {
            tracing::error!(error = format!("{:?}", e), "Failed to set up Ctrl+C handler");
            anyhow::Error::new(e)
        })?;

        tracing::info!("received Ctrl+C (SIGINT)");
    }

    tracing::info!("all clean, exiting!");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&cli.log_level))?;

    let fmt_layer = if cli.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed()
    };

    // Initialize tracing.
    tracing_subscriber::registry().with(filter).with(fmt_layer).init();

    let cfg = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Estimate(ref args) => cmd_estimate::main(&cfg, args),
        Commands::Interactive { no_color } => cmd_interactive::main(&cfg, !no_color),
        Commands::Serve { ref bind } => {
            tokio::spawn(async { handle_signals().await });
            cmd_serve::main(&cli, cfg, bind.as_deref()).await
        }
    }
}
