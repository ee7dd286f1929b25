use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hw_watchbot::config::{self, ConfigError};
use hw_watchbot::error::PollError;
use hw_watchbot::notify::TelegramNotifier;
use hw_watchbot::poller::{PollLoop, TickOutcome};
use hw_watchbot::practicum::PracticumClient;

#[derive(Debug, Parser)]
#[command(author, version, about = "Report Practicum homework review status changes to Telegram")]
struct Args {
    /// Optional YAML config file; credentials are read from the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single poll and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env file is fine; variables may come from the real environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = match config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(ConfigError::Missing(var)) => {
            error!(variable = var, "missing required variable {var}; exiting");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            error!(%err, "invalid configuration; exiting");
            return Ok(ExitCode::FAILURE);
        }
    };

    let source = Arc::new(PracticumClient::from_config(&cfg)?);
    let notifier = Arc::new(TelegramNotifier::from_config(&cfg));
    let mut poller = PollLoop::from_config(&cfg, source, notifier, Utc::now());

    if args.once {
        return Ok(match poller.tick().await {
            Ok(TickOutcome::Notified(message)) => {
                info!(%message, "status change delivered");
                ExitCode::SUCCESS
            }
            Ok(TickOutcome::Unchanged) | Err(PollError::EmptyResult) => {
                info!("no homework status change");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(kind = err.kind(), "poll failed: {err}");
                ExitCode::FAILURE
            }
        });
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = poller.run(shutdown_rx);
    tokio::pin!(run);
    tokio::select! {
        () = &mut run => {}
        () = shutdown_signal() => {
            info!("shutdown requested; stopping after the current poll");
            shutdown_tx.send(true).ok();
            run.await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal() {
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                warn!(?err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
        () = wait_for_sigterm() => {}
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(err) => {
            warn!(?err, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await;
}
