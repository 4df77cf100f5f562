//! Windows virtualization probe
//!
//! Matches hypervisor vendor names in `SYSTEMINFO` output. Note the
//! `VMWare` capitalization: that is how the tool reports the vendor.

use super::exec::capture_stdout;
use super::HostProbe;
use async_trait::async_trait;

const SYSTEMINFO_SIGNATURES: &[&str] = &["VMWare", "VirtualBox", "KVM", "Bochs", "Parallels"];

pub struct WindowsProbe;

impl WindowsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostProbe for WindowsProbe {
    async fn is_virtual_machine(&self) -> bool {
        let output = capture_stdout("SYSTEMINFO", &[]).await;
        matches_systeminfo(&output)
    }
}

pub(crate) fn matches_systeminfo(output: &str) -> bool {
    SYSTEMINFO_SIGNATURES.iter().any(|sig| output.contains(sig))
}
