//! Virtualization detection
//!
//! Classifies the host as a virtual or physical machine by running one or
//! more OS diagnostic commands and matching their output against known
//! hypervisor vendor signatures. One probe implementation per OS family,
//! selected once at construction.
//!
//! The verdict is deliberately conservative: an unknown OS or a failed
//! probe command yields "not a VM", never a false positive.

mod exec;
mod linux;
mod macos;
mod windows;

pub use linux::LinuxProbe;
pub use macos::MacosProbe;
pub use windows::WindowsProbe;

use tracing::warn;

pub use async_trait::async_trait;

/// OS-specific probe that inspects the host for hypervisor signatures.
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// Run the probe commands and evaluate the vendor signatures.
    /// Execution failures degrade to `false`.
    async fn is_virtual_machine(&self) -> bool;
}

/// Probe for OS families we do not know how to inspect.
struct UnknownOsProbe;

#[async_trait]
impl HostProbe for UnknownOsProbe {
    async fn is_virtual_machine(&self) -> bool {
        false
    }
}

/// Select the probe for the current OS family.
///
/// `root_password` only changes behavior on Linux, where it enables the
/// privileged DMI inventory path.
pub fn select_probe(root_password: Option<String>) -> Box<dyn HostProbe> {
    match std::env::consts::OS {
        "linux" => Box::new(LinuxProbe::new(root_password)),
        "windows" => Box::new(WindowsProbe::new()),
        "macos" => Box::new(MacosProbe::new()),
        other => {
            warn!(os = other, "Unable to detect OS type, assuming physical host");
            Box::new(UnknownOsProbe)
        }
    }
}

/// One-shot virtualization verdict for the current host.
///
/// The host is probed exactly once at construction; the verdict is immutable
/// afterwards.
#[derive(Debug, Clone, Copy)]
pub struct VirtualizationDetector {
    is_vm: bool,
}

impl VirtualizationDetector {
    /// Probe the host using the unprivileged command set.
    pub async fn detect() -> Self {
        Self::from_probe(select_probe(None).as_ref()).await
    }

    /// Probe the host, using privileged commands where the OS supports them.
    pub async fn detect_privileged(root_password: impl Into<String>) -> Self {
        Self::from_probe(select_probe(Some(root_password.into())).as_ref()).await
    }

    /// Evaluate an explicit probe (test seam).
    pub async fn from_probe(probe: &dyn HostProbe) -> Self {
        Self {
            is_vm: probe.is_virtual_machine().await,
        }
    }

    /// Whether the host was classified as a virtual machine.
    pub fn is_virtual_machine(&self) -> bool {
        self.is_vm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(bool);

    #[async_trait]
    impl HostProbe for FixedProbe {
        async fn is_virtual_machine(&self) -> bool {
            self.0
        }
    }

    #[tokio::test]
    async fn test_detector_reports_probe_verdict() {
        let vm = VirtualizationDetector::from_probe(&FixedProbe(true)).await;
        assert!(vm.is_virtual_machine());

        let physical = VirtualizationDetector::from_probe(&FixedProbe(false)).await;
        assert!(!physical.is_virtual_machine());
    }

    #[tokio::test]
    async fn test_unknown_os_probe_defaults_to_physical() {
        assert!(!UnknownOsProbe.is_virtual_machine().await);
    }
}
