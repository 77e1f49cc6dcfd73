//! In-memory BLE central used to drive `GamepadLink` in tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use gamepad_link::core::bluetooth::{
    BleCentral, LinkContext, NotificationHandler, ScanEntry, ScanParams,
};
use uuid::Uuid;

/// A peripheral the mock scan reports
#[derive(Debug, Clone)]
pub struct MockDevice {
    pub id: String,
    pub name: Option<String>,
    pub refuse_connect: bool,
    /// Service discovery fails with a stack error once linked
    pub service_lookup_fails: bool,
    pub has_service: bool,
    pub has_characteristic: bool,
    pub can_notify: bool,
}

impl MockDevice {
    /// A well-behaved gamepad
    pub fn gamepad(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            refuse_connect: false,
            service_lookup_fails: false,
            has_service: true,
            has_characteristic: true,
            can_notify: true,
        }
    }
}

#[derive(Default)]
struct MockState {
    devices: Vec<MockDevice>,
    inits: usize,
    scans: usize,
    clears: usize,
    connect_attempts: Vec<String>,
    disconnects: Vec<String>,
    connected: HashSet<String>,
    contexts: HashMap<String, LinkContext>,
    handlers: HashMap<String, NotificationHandler>,
    last_params: Option<ScanParams>,
}

/// Cloneable so the test keeps a handle after the link takes ownership
#[derive(Clone, Default)]
pub struct MockCentral {
    state: Arc<Mutex<MockState>>,
}

impl MockCentral {
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        let central = Self::default();
        central.set_devices(devices);
        central
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn set_devices(&self, devices: Vec<MockDevice>) {
        self.state().devices = devices;
    }

    pub fn inits(&self) -> usize {
        self.state().inits
    }

    pub fn scans(&self) -> usize {
        self.state().scans
    }

    pub fn clears(&self) -> usize {
        self.state().clears
    }

    pub fn connect_attempts(&self) -> Vec<String> {
        self.state().connect_attempts.clone()
    }

    pub fn disconnects(&self) -> Vec<String> {
        self.state().disconnects.clone()
    }

    pub fn last_params(&self) -> Option<ScanParams> {
        self.state().last_params
    }

    /// The peripheral drops the link on its side
    pub fn drop_link(&self, id: &str) {
        let context = {
            let mut state = self.state();
            state.connected.remove(id);
            state.contexts.get(id).cloned()
        };
        if let Some(context) = context {
            context.on_disconnect();
        }
    }

    /// The stack reports the link as up again without a connect call
    pub fn restore_link(&self, id: &str) {
        let context = {
            let mut state = self.state();
            state.connected.insert(id.to_string());
            state.contexts.get(id).cloned()
        };
        context.expect("device was never connected").on_connect();
    }

    /// The peripheral sends an input report
    pub fn notify(&self, id: &str, data: &[u8]) {
        let handler = self.state().handlers.get(id).cloned();
        handler.expect("no subscription for device").handle(data);
    }

    fn device(&self, id: &str) -> Result<MockDevice> {
        self.state()
            .devices
            .iter()
            .find(|device| device.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown device {}", id))
    }
}

#[async_trait::async_trait]
impl BleCentral for MockCentral {
    type Device = String;
    type Service = String;
    type Characteristic = String;

    async fn init(&self) -> Result<()> {
        self.state().inits += 1;
        Ok(())
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<ScanEntry<String>>> {
        let mut state = self.state();
        state.scans += 1;
        state.last_params = Some(*params);
        Ok(state
            .devices
            .iter()
            .map(|device| ScanEntry {
                device: device.id.clone(),
                name: device.name.clone(),
                id: device.id.clone(),
                rssi: Some(-50),
            })
            .collect())
    }

    async fn clear_scan_results(&self) {
        self.state().clears += 1;
    }

    async fn connect(&self, device: &String, context: LinkContext) -> Result<()> {
        self.state().connect_attempts.push(device.clone());
        if self.device(device)?.refuse_connect {
            return Err(anyhow!("connection refused by {}", device));
        }
        {
            let mut state = self.state();
            state.connected.insert(device.clone());
            state.contexts.insert(device.clone(), context.clone());
        }
        context.on_connect();
        Ok(())
    }

    async fn is_connected(&self, device: &String) -> bool {
        self.state().connected.contains(device)
    }

    async fn disconnect(&self, device: &String) -> Result<()> {
        let context = {
            let mut state = self.state();
            state.disconnects.push(device.clone());
            state.handlers.remove(device);
            if state.connected.remove(device) { state.contexts.get(device).cloned() } else { None }
        };
        if let Some(context) = context {
            context.on_disconnect();
        }
        Ok(())
    }

    async fn find_service(&self, device: &String, _uuid: Uuid) -> Result<Option<String>> {
        let device_info = self.device(device)?;
        if device_info.service_lookup_fails {
            return Err(anyhow!("GATT discovery failed on {}", device));
        }
        Ok(device_info.has_service.then(|| device.clone()))
    }

    async fn find_characteristic(&self, service: &String, _uuid: Uuid) -> Result<Option<String>> {
        Ok(self.device(service)?.has_characteristic.then(|| service.clone()))
    }

    async fn can_notify(&self, characteristic: &String) -> Result<bool> {
        Ok(self.device(characteristic)?.can_notify)
    }

    async fn subscribe(
        &self,
        device: &String,
        _characteristic: &String,
        handler: NotificationHandler,
    ) -> Result<()> {
        self.state().handlers.insert(device.clone(), handler);
        Ok(())
    }
}
