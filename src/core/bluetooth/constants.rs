//! Constants used throughout the link
//! This module contains the wire contract the gamepad must match and the
//! timing values that drive scanning and reconnection.

use uuid::Uuid;

/// The advertised name of the gamepad, matched exactly
pub const GAMEPAD_NAME: &str = "BLE Gamepad";

/// Human Interface Device service (0x1812)
pub const UUID_HID_SERVICE: Uuid = uuid_from_u16(0x1812);

/// HID input report characteristic (0x2A4D)
pub const UUID_HID_INPUT_REPORT: Uuid = uuid_from_u16(0x2A4D);

/// Scan duration in seconds
pub const DEFAULT_SCAN_DURATION_SECS: u64 = 5;

/// Scan interval, in the stack's 0.625 ms units
pub const DEFAULT_SCAN_INTERVAL: u16 = 100;

/// Scan window, in the stack's 0.625 ms units
pub const DEFAULT_SCAN_WINDOW: u16 = 99;

/// Minimum time between two reconnect attempts in milliseconds
pub const RECONNECT_INTERVAL_MS: u64 = 2000;

/// Settling time after a lost link before the handle is dropped, in milliseconds
pub const DISCONNECT_GRACE_MS: u64 = 500;

/// Build a full UUID from a 16-bit Bluetooth SIG short UUID
pub const fn uuid_from_u16(short: u16) -> Uuid {
    Uuid::from_u128(((short as u128) << 96) | 0x0000_0000_0000_1000_8000_00805f9b34fb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_uuids_expand_onto_the_base_uuid() {
        assert_eq!(UUID_HID_SERVICE.to_string(), "00001812-0000-1000-8000-00805f9b34fb");
        assert_eq!(UUID_HID_INPUT_REPORT.to_string(), "00002a4d-0000-1000-8000-00805f9b34fb");
    }
}
