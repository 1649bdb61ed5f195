use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use crate::api;
use crate::application::ExpenseService;
use crate::logging::init_logging;

/// Spendlog - Personal Expense Tracker
#[derive(Parser, Debug)]
#[command(name = "spendlog")]
#[command(about = "Track personal expenses in a CSV ledger through a small web app")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, default_value = "expenses.csv")]
    pub ledger: PathBuf,

    /// Address to serve on
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let _logger = init_logging(self.verbose).context("Failed to start logging")?;

        let service = ExpenseService::init(self.ledger.clone()).await?;
        let app = api::router(service);

        let listener = TcpListener::bind(self.bind)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind))?;
        info!(
            "serving {} on http://{}",
            self.ledger.display(),
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server failed")?;

        info!("shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("cannot listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["spendlog"]).unwrap();
        assert_eq!(cli.ledger, PathBuf::from("expenses.csv"));
        assert_eq!(cli.bind, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "spendlog",
            "--ledger",
            "/tmp/ledger.csv",
            "-b",
            "0.0.0.0:9000",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.ledger, PathBuf::from("/tmp/ledger.csv"));
        assert_eq!(cli.bind.port(), 9000);
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_bad_address() {
        assert!(Cli::try_parse_from(["spendlog", "--bind", "nowhere"]).is_err());
    }
}
