//! Gamepad link library
//! Connects a vehicle controller's host loop to a BLE HID gamepad and exposes
//! the decoded stick state for polling.

// Module declarations
pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::config::AppConfig;
pub use crate::core::bluetooth::{BleCentral, BluestCentral, GamepadLink, LinkState};
pub use crate::core::report::{InputSample, ReportButtons};
pub use crate::error::LinkError;
