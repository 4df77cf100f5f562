//! macOS virtualization probe
//!
//! Inspects the I/O registry for hypervisor manufacturer and vendor names.
//! The full `ioreg -l` dump is reduced in-process to the manufacturer and
//! vendor-name lines before matching.

use super::exec::capture_stdout;
use super::HostProbe;
use async_trait::async_trait;

const IOREG_SIGNATURES: &[&str] = &["VirtualBox", "VMware", "Oracle", "Bochs", "Parallels"];

pub struct MacosProbe;

impl MacosProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostProbe for MacosProbe {
    async fn is_virtual_machine(&self) -> bool {
        let output = capture_stdout("ioreg", &["-l"]).await;
        matches_ioreg(&vendor_lines(&output))
    }
}

pub(crate) fn matches_ioreg(output: &str) -> bool {
    IOREG_SIGNATURES.iter().any(|sig| output.contains(sig))
}

/// Reduce an `ioreg -l` dump to manufacturer / vendor-name lines.
pub(crate) fn vendor_lines(output: &str) -> String {
    output
        .lines()
        .filter(|line| line.contains("Manufacturer") || line.contains("Vendor Name"))
        .collect::<Vec<_>>()
        .join("\n")
}
