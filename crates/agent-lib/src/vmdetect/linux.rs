//! Linux virtualization probe
//!
//! Unprivileged hosts are fingerprinted through hypervisor-created disk
//! names under `/dev/disk/by-id/`. When a root password is available the
//! probe instead reads the DMI system inventory, which also catches
//! Hyper-V guests that expose nothing distinctive in the disk names.

use super::exec::{capture_stdout, capture_stdout_with_stdin};
use super::HostProbe;
use async_trait::async_trait;
use tracing::debug;

/// Hypervisor fingerprints in `/dev/disk/by-id/` entries.
const DISK_ID_SIGNATURES: &[&str] = &[
    "QEMU",
    "VMware",
    "VirtualBox",
    "KVM",
    "Bochs",
    "Parallels",
];

/// Hypervisor fingerprints in the DMI system product name.
const PRODUCT_NAME_SIGNATURES: &[&str] = &[
    "VMware Virtual Platform",
    "VirtualBox",
    "KVM",
    "Bochs",
    "Parallels",
];

pub struct LinuxProbe {
    root_password: Option<String>,
}

impl LinuxProbe {
    pub fn new(root_password: Option<String>) -> Self {
        Self { root_password }
    }

    async fn probe_disk_ids(&self) -> bool {
        let output = capture_stdout("ls", &["-l", "/dev/disk/by-id/"]).await;
        matches_disk_ids(&output)
    }

    async fn probe_dmi(&self, root_password: &str) -> bool {
        // sudo -S reads the password from stdin; -p '' silences the prompt
        let stdin = format!("{root_password}\n");

        let product = capture_stdout_with_stdin(
            "sudo",
            &["-S", "-p", "", "dmidecode", "-s", "system-product-name"],
            Some(&stdin),
        )
        .await;
        if matches_product_name(&product) {
            return true;
        }

        // Hyper-V reports a generic product name; its signature is the
        // manufacturer/product field pair in the full DMI table
        let table = capture_stdout_with_stdin(
            "sudo",
            &["-S", "-p", "", "dmidecode"],
            Some(&stdin),
        )
        .await;
        matches_hyperv(&manufacturer_product_lines(&table))
    }
}

#[async_trait]
impl HostProbe for LinuxProbe {
    async fn is_virtual_machine(&self) -> bool {
        match &self.root_password {
            Some(password) => {
                debug!("Probing DMI inventory (privileged)");
                self.probe_dmi(password).await
            }
            None => {
                debug!("Probing disk identifiers (unprivileged)");
                self.probe_disk_ids().await
            }
        }
    }
}

pub(crate) fn matches_disk_ids(output: &str) -> bool {
    DISK_ID_SIGNATURES.iter().any(|sig| output.contains(sig))
}

pub(crate) fn matches_product_name(output: &str) -> bool {
    PRODUCT_NAME_SIGNATURES.iter().any(|sig| output.contains(sig))
}

/// Hyper-V requires both fields to match; either alone is not enough.
pub(crate) fn matches_hyperv(output: &str) -> bool {
    output.contains("Microsoft Corporation") && output.contains("Virtual Machine")
}

/// Reduce a full DMI table dump to its manufacturer/product lines.
pub(crate) fn manufacturer_product_lines(output: &str) -> String {
    output
        .lines()
        .filter(|line| {
            let lower = line.to_ascii_lowercase();
            lower.contains("manufacturer") || lower.contains("product")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
