use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::core::bluetooth::{
    DEFAULT_SCAN_DURATION_SECS, DEFAULT_SCAN_INTERVAL, DEFAULT_SCAN_WINDOW, DISCONNECT_GRACE_MS,
    GAMEPAD_NAME, RECONNECT_INTERVAL_MS, ScanParams, UUID_HID_INPUT_REPORT, UUID_HID_SERVICE,
};

/// Which gamepad to look for and how to pace scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Advertised name of the gamepad. Must match exactly.
    pub device_name: String,

    /// HID service UUID
    pub service_uuid: Uuid,

    /// HID input report characteristic UUID
    pub input_char_uuid: Uuid,

    /// Length of one scan in seconds
    pub scan_duration_secs: u64,

    /// Scan interval (0.625 ms units)
    pub scan_interval: u16,

    /// Scan window (0.625 ms units)
    pub scan_window: u16,

    /// Request scan responses from advertisers
    pub active_scan: bool,

    /// Minimum time between reconnect attempts
    pub reconnect_interval_ms: u64,

    /// Wait after a lost link before the handle is released
    pub disconnect_grace_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            device_name: GAMEPAD_NAME.to_string(),
            service_uuid: UUID_HID_SERVICE,
            input_char_uuid: UUID_HID_INPUT_REPORT,
            scan_duration_secs: DEFAULT_SCAN_DURATION_SECS,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            scan_window: DEFAULT_SCAN_WINDOW,
            active_scan: true,
            reconnect_interval_ms: RECONNECT_INTERVAL_MS,
            disconnect_grace_ms: DISCONNECT_GRACE_MS,
        }
    }
}

impl LinkConfig {
    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            active: self.active_scan,
            interval: self.scan_interval,
            window: self.scan_window,
            duration: Duration::from_secs(self.scan_duration_secs),
        }
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn disconnect_grace(&self) -> Duration {
        Duration::from_millis(self.disconnect_grace_ms)
    }
}
