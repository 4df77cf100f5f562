//! healthmon - Health monitoring agent for a device management server
//!
//! One invocation runs one sampling cycle (an external scheduler such as
//! cron repeats it), or answers a standalone virtualization query, or
//! manages the recorded configuration path.

use anyhow::Result;
use clap::{Parser, Subcommand};
use healthmon_lib::{
    locator, ApiSampler, CycleState, FilePreferenceStore, Orchestrator, PreferenceStore,
    VirtualizationDetector, CONFIG_PATH_KEY,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod settings;

/// Health monitoring agent for a device management server
#[derive(Parser)]
#[command(name = "healthmon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sampling cycle and append a telemetry record
    Monitor {
        /// Telemetry log file (overrides HEALTHMON_LOG_PATH)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Classify this host as a virtual or physical machine
    DetectVm {
        /// Root password for the privileged DMI probe (Linux only)
        #[arg(long, env = "HEALTHMON_ROOT_PASSWORD", hide_env_values = true)]
        root_password: Option<String>,
    },

    /// Inspect or update the recorded configuration file path
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the recorded configuration path and whether it resolves
    Show,

    /// Record a configuration file path
    Set {
        /// Path to the configuration XML file
        path: PathBuf,
    },

    /// Search conventional locations for config.xml and record the result
    Discover,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer())
        .init();

    match cli.command {
        Commands::Monitor { log_file } => run_monitor(log_file).await,
        Commands::DetectVm { root_password } => run_detect_vm(root_password).await,
        Commands::Config(command) => run_config(command),
    }
}

/// One sampling cycle. Cycle failures are logged by the orchestrator and do
/// not fail the process; only misconfiguration does.
async fn run_monitor(log_file: Option<PathBuf>) -> Result<()> {
    let settings = settings::Settings::load()?;

    let log_path = match log_file {
        Some(path) => path,
        None if !settings.log_path.is_empty() => PathBuf::from(&settings.log_path),
        None => anyhow::bail!(
            "no telemetry log path configured; pass --log-file or set HEALTHMON_LOG_PATH"
        ),
    };

    let sampler = ApiSampler::with_timeout(Duration::from_secs(settings.request_timeout_secs))?;
    let store = FilePreferenceStore::open_default()?;
    let mut orchestrator = Orchestrator::new(store, sampler, log_path)?;

    let outcome = orchestrator.run_cycle().await;
    match outcome.state {
        CycleState::Done => info!("Sampling cycle complete"),
        _ => warn!("Sampling cycle aborted"),
    }

    // The external scheduler decides when to try again
    Ok(())
}

async fn run_detect_vm(root_password: Option<String>) -> Result<()> {
    let detector = match root_password {
        Some(password) => VirtualizationDetector::detect_privileged(password).await,
        None => VirtualizationDetector::detect().await,
    };

    if detector.is_virtual_machine() {
        println!("virtual");
    } else {
        println!("physical");
    }
    Ok(())
}

fn run_config(command: ConfigCommands) -> Result<()> {
    let mut store = FilePreferenceStore::open_default()?;

    match command {
        ConfigCommands::Show => match store.get(CONFIG_PATH_KEY) {
            Some(path) => {
                let resolves = locator::can_get_file(&store);
                println!("{path} ({})", if resolves { "exists" } else { "missing" });
            }
            None => println!("no configuration path recorded"),
        },
        ConfigCommands::Set { path } => {
            if !path.is_file() {
                warn!(path = %path.display(), "Recorded path does not currently resolve to a file");
            }
            store.set(CONFIG_PATH_KEY, &path.to_string_lossy())?;
            println!("recorded {}", path.display());
        }
        ConfigCommands::Discover => {
            if locator::attempt_auto_discover(&mut store) {
                // attempt_auto_discover only returns true after recording
                println!(
                    "discovered {}",
                    store.get(CONFIG_PATH_KEY).unwrap_or_default()
                );
            } else {
                println!("no configuration file found");
            }
        }
    }
    Ok(())
}
