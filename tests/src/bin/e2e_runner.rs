use anyhow::Result;
use clap::Parser;
use metricsdb_e2e_tests::{run, HarnessConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// metricsdb end-to-end verification runner
#[derive(Parser)]
#[command(name = "e2e_runner")]
#[command(about = "Replay recorded write/query fixtures against an in-process metricsdb")]
#[command(version)]
struct Cli {
    /// Fixture corpus root
    #[arg(long)]
    testdata: Option<PathBuf>,

    /// Fixture category (sub-directory of the corpus root)
    #[arg(long)]
    category: Option<String>,

    /// Delay between a fixture's write and its query, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Upper bound on waiting for the service to report healthy, in milliseconds
    #[arg(long)]
    startup_timeout_ms: Option<u64>,

    /// Front-end listen address
    #[arg(long)]
    listen: Option<String>,

    /// Graphite listen address
    #[arg(long)]
    graphite_listen: Option<String>,

    /// Fixed workspace directory instead of a temporary one
    #[arg(long)]
    workspace: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut HarnessConfig) {
        if let Some(dir) = self.testdata {
            config.testdata_dir = dir;
        }
        if let Some(category) = self.category {
            config.category = category;
        }
        if let Some(ms) = self.settle_ms {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.startup_timeout_ms {
            config.startup_timeout = Duration::from_millis(ms);
        }
        if let Some(addr) = self.listen {
            config.http_listen_addr = addr;
        }
        if let Some(addr) = self.graphite_listen {
            config.graphite_listen_addr = addr;
        }
        if let Some(path) = self.workspace {
            config.workspace_path = Some(path);
        }
    }
}

fn load_config() -> Result<HarnessConfig> {
    let mut config = HarnessConfig::load()?;
    Cli::parse().apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return ExitCode::from(2);
        }
    };
    info!("Loaded configuration: {:?}", config);

    match run(&config).await {
        Ok(report) => {
            report.log_summary();
            if report.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Harness aborted ({}): {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}
