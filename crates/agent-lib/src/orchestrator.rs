//! Sampling cycle orchestration
//!
//! One cycle per process invocation: locate config, parse it, sample both
//! command queues, append the telemetry line. An external scheduler re-runs
//! the agent; there are no in-process retries. Every error is caught and
//! logged here so the process can exit cleanly regardless of the outcome.

use crate::config::{self, ConfigError};
use crate::locator;
use crate::prefs::{PreferenceStore, CONFIG_PATH_KEY};
use crate::sampler::{ApiSampler, CommandQueue, SampleError};
use crate::telemetry::{self, LogError, MemorySnapshot, SampleResult};
use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// States of one sampling cycle. `Logging` failures do not abort: the cycle
/// still reaches `Done`, minus that cycle's log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    LocatingConfig,
    ParsingConfig,
    Sampling,
    Logging,
    Done,
    Aborted,
}

/// Why a cycle aborted, or lost its log line.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("no configuration file could be located")]
    ConfigNotFound,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Result of one cycle. `sample` is present whenever both queue reads
/// succeeded, even if appending it to the log then failed.
#[derive(Debug)]
pub struct CycleOutcome {
    pub state: CycleState,
    pub sample: Option<SampleResult>,
    pub error: Option<CycleError>,
}

fn enter(state: CycleState) {
    tracing::debug!(?state, "Cycle state transition");
}

impl CycleOutcome {
    fn aborted(error: CycleError) -> Self {
        Self {
            state: CycleState::Aborted,
            sample: None,
            error: Some(error),
        }
    }
}

/// Sequences one sampling cycle against an injected preference store.
pub struct Orchestrator<S: PreferenceStore> {
    store: S,
    sampler: ApiSampler,
    log_path: PathBuf,
}

impl<S: PreferenceStore> Orchestrator<S> {
    /// Build an orchestrator. An empty log path is a configuration error:
    /// the log destination must always be supplied by the caller.
    pub fn new(
        store: S,
        sampler: ApiSampler,
        log_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let log_path = log_path.into();
        if log_path.as_os_str().is_empty() {
            anyhow::bail!("telemetry log path must not be empty");
        }
        Ok(Self {
            store,
            sampler,
            log_path,
        })
    }

    /// Run one Locate -> Parse -> Sample -> Log cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        enter(CycleState::LocatingConfig);
        let config_path = match self.locate_config() {
            Some(path) => path,
            None => {
                error!("Path to config.xml not found; run `healthmon config set` to record one");
                return CycleOutcome::aborted(CycleError::ConfigNotFound);
            }
        };

        enter(CycleState::ParsingConfig);
        let configuration = match config::parse(&config_path) {
            Ok(configuration) => configuration,
            Err(e) => {
                error!(path = %config_path.display(), error = %e, "Config file damaged, unable to run monitor");
                return CycleOutcome::aborted(e.into());
            }
        };

        enter(CycleState::Sampling);
        let mobile_device_count = match self.check_queue(&configuration, CommandQueue::MobileDevice).await {
            Ok(count) => count,
            Err(outcome) => return outcome,
        };
        let computer_count = match self.check_queue(&configuration, CommandQueue::Computer).await {
            Ok(count) => count,
            Err(outcome) => return outcome,
        };

        let memory = MemorySnapshot::capture();
        let sample = SampleResult {
            timestamp: Local::now(),
            mobile_device_count,
            computer_count,
            free_memory_bytes: memory.free_bytes,
            total_memory_bytes: memory.total_bytes,
        };

        // Logging failure costs the line, not the cycle
        enter(CycleState::Logging);
        let error = match telemetry::append(&self.log_path, &sample).await {
            Ok(()) => {
                info!(
                    mobile_device_count,
                    computer_count,
                    log = %self.log_path.display(),
                    "Sample recorded"
                );
                None
            }
            Err(e) => {
                error!(error = %e, "Error writing to log; sample lost for this cycle");
                Some(e.into())
            }
        };

        CycleOutcome {
            state: CycleState::Done,
            sample: Some(sample),
            error,
        }
    }

    fn locate_config(&mut self) -> Option<PathBuf> {
        if !locator::can_get_file(&self.store) && !locator::attempt_auto_discover(&mut self.store) {
            return None;
        }
        self.store.get(CONFIG_PATH_KEY).map(PathBuf::from)
    }

    async fn check_queue(
        &self,
        configuration: &crate::config::Configuration,
        queue: CommandQueue,
    ) -> Result<u64, CycleOutcome> {
        self.sampler
            .check_queue_length(
                &configuration.endpoint_url,
                &configuration.username,
                &configuration.password,
                queue,
            )
            .await
            .map_err(|e| {
                warn!(queue = queue.resource(), error = %e, "Queue sampling failed, aborting cycle");
                CycleOutcome::aborted(e.into())
            })
    }

    /// The telemetry log this orchestrator appends to.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
