use std::sync::LazyLock;

use anyhow::Result;
use log::{debug, info};
use regex::Regex;

use crate::core::bluetooth::central::BleCentral;
use crate::core::bluetooth::types::{ScanEntry, ScanParams};

static MAC_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})").expect("MAC address pattern is valid")
});

pub struct BluetoothScanner {
    params: ScanParams,
}

impl BluetoothScanner {
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    /// Runs one blocking scan and logs everything it saw
    pub async fn scan<C: BleCentral>(&self, central: &C) -> Result<Vec<ScanEntry<C::Device>>> {
        let found = central.scan(&self.params).await?;
        info!("Found {} BLE devices", found.len());
        for (index, entry) in found.iter().enumerate() {
            let address = Self::extract_mac_address(&entry.id).unwrap_or_else(|| "N/A".to_string());
            debug!("Device {}: {}, Address: {}", index, entry, address);
        }
        Ok(found)
    }

    /// Devices advertising exactly `name`, in discovery order
    pub fn candidates<'a, D>(
        found: &'a [ScanEntry<D>],
        name: &'a str,
    ) -> impl Iterator<Item = &'a ScanEntry<D>> + 'a {
        found.iter().filter(move |entry| entry.has_name(name))
    }

    fn extract_mac_address(device_id_str: &str) -> Option<String> {
        MAC_ADDRESS
            .find_iter(device_id_str)
            .last()
            .map(|m| m.as_str().to_uppercase())
    }
}
