//! Defines shared data structures for the Bluetooth module.

use std::fmt;
use std::time::Duration;

/// One device seen during a scan, in discovery order
#[derive(Debug, Clone)]
pub struct ScanEntry<D> {
    /// The stack's handle for the device
    pub device: D,
    /// Advertised local name, if the device sent one
    pub name: Option<String>,
    /// Platform-specific unique identifier
    pub id: String,
    /// The signal strength (RSSI) of the device
    pub rssi: Option<i16>,
}

impl<D> ScanEntry<D> {
    /// Returns true if the advertised name is exactly `expected`
    pub fn has_name(&self, expected: &str) -> bool {
        self.name.as_deref() == Some(expected)
    }
}

impl<D> fmt::Display for ScanEntry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}, ID: {}", self.name.as_deref().unwrap_or("<none>"), self.id)?;
        if let Some(rssi) = self.rssi {
            write!(f, ", RSSI: {}", rssi)?;
        }
        Ok(())
    }
}

/// Parameters for a single bounded scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    /// Solicit scan responses instead of only capturing advertisements
    pub active: bool,
    /// Scan interval, in 0.625 ms units
    pub interval: u16,
    /// Scan window, in 0.625 ms units
    pub window: u16,
    /// How long the scan runs
    pub duration: Duration,
}

/// Lifecycle of the link as seen by the host loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Never connected, or disconnected on request
    #[default]
    Disconnected,
    /// A scan-and-connect attempt is in progress
    Scanning,
    /// Subscribed and receiving reports
    Connected,
    /// The link was lost; the timed retry is running
    Reconnecting,
}
