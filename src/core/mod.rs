//! Core functionality for the gamepad link
//! This module contains the BLE link and the input report parser

pub mod bluetooth;
pub mod report;

// Re-export commonly used types
pub use bluetooth::GamepadLink;
pub use report::{InputSample, ReportButtons, ReportParser};
