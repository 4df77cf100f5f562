//! Core library for the healthmon device-management health agent
//!
//! This crate provides the pieces of one sampling cycle:
//! - Configuration discovery and parsing
//! - Queue-length sampling against the management server API
//! - Telemetry log appending
//! - Host virtualization detection
//! - The orchestrator sequencing a cycle end to end

pub mod config;
pub mod locator;
pub mod orchestrator;
pub mod prefs;
pub mod sampler;
pub mod telemetry;
pub mod vmdetect;

pub use config::{ConfigError, Configuration};
pub use orchestrator::{CycleError, CycleOutcome, CycleState, Orchestrator};
pub use prefs::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, PrefsError, CONFIG_PATH_KEY,
};
pub use sampler::{ApiSampler, CommandQueue, SampleError};
pub use telemetry::{LogError, MemorySnapshot, SampleResult};
pub use vmdetect::VirtualizationDetector;
