//! CLI argument parsing and run dispatch

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use qload_core::{Error, FailurePolicy, OrchestratorBuilder, RunConfig, RunStats};
use qload_transport::ReqwestTransport;

/// Exit status after an interrupted run
pub const EXIT_INTERRUPTED: u8 = 1;
/// Exit status after a fail-fast abort
pub const EXIT_ABORTED: u8 = 2;

/// qload - queue-driven concurrent HTTP load generator
#[derive(Parser, Debug)]
#[command(name = "qload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target address
    #[arg(short, long, value_name = "HOST:PORT")]
    pub target: Option<String>,

    /// Number of requests to send
    #[arg(short = 'n', long, value_name = "N")]
    pub requests: Option<usize>,

    /// Number of workers (requests in flight)
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Queue capacity as a multiple of the concurrency
    #[arg(long, value_name = "N")]
    pub queue_multiplier: Option<usize>,

    /// Abort the whole run on the first transport error
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging (per-response status and headers)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run configuration: defaults, then the config file, then flags
    pub fn to_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("Failed to load config from: {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(target) = &self.target {
            config.target = target.clone();
        }
        if let Some(requests) = self.requests {
            config.total_requests = requests;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(multiplier) = self.queue_multiplier {
            config.queue_capacity_multiplier = multiplier;
        }
        if self.fail_fast {
            config.failure_policy = FailurePolicy::Abort;
        }

        Ok(config)
    }

    /// Run once and return the process exit status
    pub async fn run(&self) -> Result<u8> {
        let config = self.to_config()?;

        let transport = ReqwestTransport::new().context("Failed to create HTTP transport")?;
        let orchestrator = OrchestratorBuilder::new()
            .config(config)
            .transport(Arc::new(transport))
            .build()
            .context("Invalid configuration")?;

        match orchestrator.run_with_signal_handling().await {
            Ok(stats) => {
                self.print_results(&stats)?;
                Ok(0)
            }
            Err(e) => match exit_status(&e) {
                Some(status) => {
                    tracing::error!(error = %e, "Run did not complete");
                    Ok(status)
                }
                None => Err(e).context("Run failed"),
            },
        }
    }

    fn print_results(&self, stats: &RunStats) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(stats)?);
        } else {
            println!("{stats}");
        }
        Ok(())
    }
}

/// Exit status for errors that end a run early; `None` for any other error
pub fn exit_status(err: &Error) -> Option<u8> {
    if !err.is_cancellation() {
        return None;
    }
    match err {
        Error::Aborted { .. } => Some(EXIT_ABORTED),
        _ => Some(EXIT_INTERRUPTED),
    }
}
