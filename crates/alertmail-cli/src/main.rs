//! `alertmail` - send one alert email through an SMTP relay.
//!
//! ```bash
//! alertmail --config /etc/alertmail.toml --subject DOWN --body "HTTP check failed" \
//!     --resource 10.0.0.1:80
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `alertmail=info`).

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alertmail::{AlertAttempt, AlertConfig, ResourceContext};

#[derive(Debug, Parser)]
#[command(name = "alertmail")]
#[command(about = "Send one alert email through an SMTP relay", long_about = None)]
struct Cli {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "/etc/alertmail.toml")]
    config: PathBuf,

    /// Alert subject; the configured id is prefixed
    #[arg(short, long)]
    subject: String,

    /// Alert body
    #[arg(short, long, default_value = "", conflicts_with = "body_file")]
    body: String,

    /// Read the alert body from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// Address of the monitored resource, added to the subject
    #[arg(short, long)]
    resource: Option<SocketAddr>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alertmail=info,alertmail_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AlertConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let body = match &cli.body_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => cli.body,
    };

    let context = cli.resource.map(ResourceContext::from);
    let Some(attempt) = AlertAttempt::new(Arc::new(config), context, &cli.subject, &body) else {
        warn!("no recipients configured, nothing to send");
        return Ok(());
    };

    attempt.deliver().await.context("alert delivery failed")
}
