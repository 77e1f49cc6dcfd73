//! Gamepad link for the vehicle controller
//! This module provides the interface the host loop polls

use log::{error, info, warn};
use std::time::Duration;

use crate::config::link_config::LinkConfig;
use crate::core::bluetooth::central::BleCentral;
use crate::core::bluetooth::connection::ConnectionManager;
use crate::core::bluetooth::context::LinkContext;
use crate::core::bluetooth::reconnect::ReconnectGate;
use crate::core::bluetooth::scanner::BluetoothScanner;
use crate::core::bluetooth::types::LinkState;
use crate::core::report::{InputSample, ReportButtons};
use crate::error::{LinkError, LinkResult};

/// Owns the connection to one gamepad and the latest sample it sent
pub struct GamepadLink<C: BleCentral> {
    central: C,
    device_name: String,
    /// Flags and sample shared with the stack's callbacks
    context: LinkContext,
    /// The current client handle; at most one at a time
    client: Option<C::Device>,
    state: LinkState,
    /// Raw flag as of the last handled edge; a manual disconnect leaves it set
    was_connected: bool,
    scanner: BluetoothScanner,
    connection_manager: ConnectionManager,
    reconnect_gate: ReconnectGate,
    disconnect_grace: Duration,
}

impl<C: BleCentral> GamepadLink<C> {
    pub fn new(central: C, config: &LinkConfig) -> Self {
        Self {
            central,
            device_name: config.device_name.clone(),
            context: LinkContext::new(),
            client: None,
            state: LinkState::Disconnected,
            was_connected: false,
            scanner: BluetoothScanner::new(config.scan_params()),
            connection_manager: ConnectionManager::new(config.service_uuid, config.input_char_uuid),
            reconnect_gate: ReconnectGate::new(config.reconnect_interval()),
            disconnect_grace: config.disconnect_grace(),
        }
    }

    /// Bring up the radio and try to connect once. Call at startup.
    pub async fn begin(&mut self) -> bool {
        info!("Gamepad link initializing, looking for {:?}", self.device_name);
        if let Err(e) = self.central.init().await {
            error!("Failed to initialize Bluetooth: {}", e);
            return false;
        }

        if self.connect().await {
            info!("Successfully linked to gamepad");
            true
        } else {
            warn!("Initial connection failed. Will retry in update()");
            false
        }
    }

    /// Handle connection edges and timed reconnects. Call once per host loop tick.
    pub async fn update(&mut self) {
        let device_connected = self.context.device_connected();

        if self.was_connected && !device_connected {
            // Give the Bluetooth stack time to settle
            tokio::time::sleep(self.disconnect_grace).await;
            self.client = None;
            self.context.clear_sample_connected();
            self.was_connected = false;
            self.state = LinkState::Reconnecting;
            warn!("Gamepad disconnected - sticks report neutral until reconnect");
        }

        if !self.was_connected && device_connected {
            self.was_connected = true;
            self.state = LinkState::Connected;
        }

        if !device_connected && self.reconnect_gate.try_acquire() {
            info!("Attempting to reconnect to gamepad...");
            self.connect().await;
        }
    }

    /// True when both the stack's flag and the sample's flag say connected
    pub fn is_connected(&self) -> bool {
        self.context.is_connected()
    }

    /// Alias of [`Self::is_connected`] kept for older callers
    pub fn connection_status(&self) -> bool {
        self.is_connected()
    }

    /// A copy of the current sample
    pub fn data(&self) -> InputSample {
        self.context.sample()
    }

    /// Button bytes of the most recent report, if any arrived
    pub fn last_buttons(&self) -> Option<ReportButtons> {
        self.context.last_buttons()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Scan for the gamepad and connect to it. Blocks for the whole scan window.
    pub async fn connect(&mut self) -> bool {
        let previous = self.state;
        self.state = LinkState::Scanning;

        match self.scan_and_connect().await {
            Ok(()) => {
                self.was_connected = true;
                self.state = LinkState::Connected;
                true
            }
            Err(e) => {
                error!("Gamepad connection failed: {}", e);
                self.state = match previous {
                    LinkState::Connected | LinkState::Reconnecting => LinkState::Reconnecting,
                    _ => LinkState::Disconnected,
                };
                false
            }
        }
    }

    /// Drop the link if there is one. The flags are cleared either way.
    ///
    /// The handle is kept until the next [`Self::update`] sees the lost link,
    /// waits out the grace period and releases it.
    pub async fn disconnect(&mut self) {
        if let Some(device) = self.client.as_ref() {
            if self.central.is_connected(device).await {
                if let Err(e) = self.central.disconnect(device).await {
                    warn!("Failed to disconnect gamepad: {}", e);
                }
            }
        }
        self.context.mark_disconnected();
        self.state = LinkState::Disconnected;
    }

    async fn scan_and_connect(&mut self) -> LinkResult<()> {
        let name = self.device_name.clone();
        info!("Scanning for: {}", name);
        let found = self.scanner.scan(&self.central).await?;

        for entry in BluetoothScanner::candidates(&found, &name) {
            info!("Found gamepad {}. Connecting...", entry);
            self.replace_client(entry.device.clone()).await;

            match self
                .connection_manager
                .try_connect(&self.central, &entry.device, &self.context)
                .await
            {
                Ok(()) => return Ok(()),
                // A refused handshake moves on to the next device with the same name.
                Err(LinkError::ConnectRefused(e)) => warn!("Failed to connect to device: {}", e),
                Err(e) => return Err(e),
            }
        }

        self.central.clear_scan_results().await;
        Err(LinkError::NotFound { name })
    }

    /// Tear down any previous client before adopting `device`
    async fn replace_client(&mut self, device: C::Device) {
        if let Some(old) = self.client.take() {
            if let Err(e) = self.central.disconnect(&old).await {
                warn!("Failed to release previous client: {}", e);
            }
        }
        self.client = Some(device);
    }
}
