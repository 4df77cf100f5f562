//! Telemetry log
//!
//! One sample per cycle, one line per sample, appended to a plain-text log
//! file. The file handle is opened and closed around each append so that
//! concurrent agent invocations interleave whole lines at the OS level.
//! Rotation is somebody else's job.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use sysinfo::System;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Timestamp layout used in the log line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One completed measurement of the two command queues plus host memory.
/// Immutable once built; written to the log exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleResult {
    pub timestamp: DateTime<Local>,
    pub mobile_device_count: u64,
    pub computer_count: u64,
    pub free_memory_bytes: u64,
    pub total_memory_bytes: u64,
}

impl SampleResult {
    /// Render the sample as its single log line, trailing newline included.
    pub fn to_log_line(&self) -> String {
        format!(
            "{} {} {} {} {}\n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.mobile_device_count,
            self.computer_count,
            self.free_memory_bytes,
            self.total_memory_bytes
        )
    }
}

/// Point-in-time host memory reading.
#[derive(Debug, Clone, Copy)]
pub struct MemorySnapshot {
    pub free_bytes: u64,
    pub total_bytes: u64,
}

impl MemorySnapshot {
    /// Capture current host memory. Only the memory tables are refreshed.
    pub fn capture() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        Self {
            free_bytes: sys.available_memory(),
            total_bytes: sys.total_memory(),
        }
    }
}

/// Errors appending to the telemetry log. Non-fatal at the cycle level: the
/// sample for that cycle is lost but the cycle still completes.
#[derive(Debug, Error)]
#[error("failed to append telemetry to {path}: {source}")]
pub struct LogError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Append one sample to the log at `path`, creating the file if absent.
pub async fn append(path: &Path, sample: &SampleResult) -> Result<(), LogError> {
    let line = sample.to_log_line();

    let wrap = |source| LogError {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await
        .map_err(wrap)?;
    file.write_all(line.as_bytes()).await.map_err(wrap)?;
    file.flush().await.map_err(wrap)
}
