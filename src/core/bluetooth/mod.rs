//! Bluetooth functionality for the gamepad link
//! This module handles all bluetooth operations including scanning,
//! connecting, and receiving input reports from the gamepad.

mod bluest_central;
mod central;
mod connection;
mod constants;
mod context;
mod manager;
mod notification;
mod reconnect;
mod scanner;
mod types;

// Re-export types that should be publicly accessible
pub use bluest_central::BluestCentral;
pub use central::BleCentral;
pub use connection::ConnectionManager;
pub use constants::*; // Re-export all constants
pub use context::LinkContext;
pub use manager::GamepadLink;
pub use notification::NotificationHandler;
pub use reconnect::ReconnectGate;
pub use scanner::BluetoothScanner;
pub use types::{LinkState, ScanEntry, ScanParams};
