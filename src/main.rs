use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use livequeue::config::{dirs_path, AgentSection, DashboardConfig, FileConfig};
use livequeue::identity::ConfiguredIdentity;
use livequeue::queue::QueueClient;
use livequeue::tui::app::ExitReason;
use livequeue::tui::runner::run_dashboard;

#[derive(Parser)]
#[command(name = "livequeue", about = "Live contact-queue dashboard. Watch, filter, pick.")]
struct Cli {
    /// Queue-status endpoint URL (GET snapshot, POST claims)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Config file to use instead of the user and project files
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between automatic refreshes
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Seconds without input before refresh pauses
    #[arg(long)]
    idle_secs: Option<u64>,

    /// Agent ARN used for picks
    #[arg(long)]
    agent_arn: Option<String>,

    /// Agent display name used for picks
    #[arg(long)]
    agent_name: Option<String>,

    /// Log file (defaults to ~/.livequeue/livequeue.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            endpoint: self.endpoint.clone(),
            refresh_secs: self.refresh_secs,
            idle_secs: self.idle_secs,
            agent: AgentSection {
                arn: self.agent_arn.clone(),
                name: self.agent_name.clone(),
            },
            ..Default::default()
        }
    }
}

/// Log to a file; the terminal belongs to the dashboard.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let path = log_file
        .map(Path::to_path_buf)
        .or_else(|| dirs_path().map(|d| d.join("livequeue.log")));

    let writer = match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("livequeue=info".parse()?),
        )
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let layers = match &cli.config {
        Some(path) => FileConfig::load_file(path)?,
        None => FileConfig::load_layers(),
    };
    let config = DashboardConfig::resolve(
        layers
            .with_env(|key| std::env::var(key).ok())
            .merge(cli.overrides()),
    )?;

    let queue = Arc::new(QueueClient::with_timeout(
        config.endpoint.clone(),
        config.request_timeout,
    )?);
    info!(
        endpoint = %queue.endpoint(),
        refresh = ?config.refresh_interval,
        idle = ?config.inactivity_timeout,
        "livequeue starting"
    );
    let identity = Arc::new(ConfiguredIdentity::new(
        config.agent_arn.clone(),
        config.agent_name.clone(),
    ));

    let reason = run_dashboard(&config, queue, identity).await?;
    if reason == ExitReason::Logout {
        println!("Session ended. Sign out at {}", config.logout_url);
    }
    Ok(())
}
