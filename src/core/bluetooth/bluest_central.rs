//! `BleCentral` over the platform Bluetooth adapter, using bluest

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};
use bluest::{Adapter, Characteristic, ConnectionEvent, Device, Service};
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::OnceCell;
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::bluetooth::central::BleCentral;
use crate::core::bluetooth::context::LinkContext;
use crate::core::bluetooth::notification::NotificationHandler;
use crate::core::bluetooth::types::{ScanEntry, ScanParams};

/// Production central backed by the default system adapter
#[derive(Default)]
pub struct BluestCentral {
    adapter: OnceCell<Adapter>,
    /// Per-device token guarding the connection-event and notification tasks
    tasks: Mutex<HashMap<String, CancellationToken>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BluestCentral {
    pub fn new() -> Self {
        Self::default()
    }

    fn adapter(&self) -> Result<&Adapter> {
        self.adapter
            .get()
            .ok_or_else(|| anyhow!("Bluetooth stack not initialized"))
    }

    /// Token for `device`'s tasks, created on first use
    fn device_token(&self, device: &Device) -> CancellationToken {
        lock(&self.tasks)
            .entry(device.id().to_string())
            .or_default()
            .clone()
    }

    fn cancel_device_tasks(&self, device: &Device) {
        if let Some(token) = lock(&self.tasks).remove(&device.id().to_string()) {
            token.cancel();
        }
    }

    /// Forward the stack's connection events for `device` into `context`
    fn watch_connection(&self, adapter: Adapter, device: Device, context: LinkContext) {
        let cancel = self.device_token(&device);
        tokio::spawn(async move {
            let mut events = match adapter.device_connection_events(&device).await {
                Ok(events) => Box::pin(events),
                Err(e) => {
                    warn!("Connection events unavailable for {}: {}", device.id(), e);
                    return;
                }
            };
            loop {
                tokio::select! {
                    event = events.next() => match event {
                        Some(ConnectionEvent::Connected) => context.on_connect(),
                        Some(ConnectionEvent::Disconnected) => {
                            context.on_disconnect();
                            break;
                        }
                        None => break,
                    },
                    _ = cancel.cancelled() => break,
                }
            }
            debug!("Stopped watching connection events for {}", device.id());
        });
    }
}

#[async_trait::async_trait]
impl BleCentral for BluestCentral {
    type Device = Device;
    type Service = Service;
    type Characteristic = Characteristic;

    async fn init(&self) -> Result<()> {
        self.adapter
            .get_or_try_init(|| async {
                let adapter = Adapter::default()
                    .await
                    .ok_or_else(|| anyhow!("No Bluetooth adapter found"))?;
                adapter.wait_available().await?;
                info!("Bluetooth adapter is available.");
                Ok::<_, anyhow::Error>(adapter)
            })
            .await?;
        Ok(())
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<ScanEntry<Device>>> {
        let adapter = self.adapter()?;
        // The host stack picks interval/window itself and always scans actively
        // where the platform allows it.
        debug!(
            "Starting scan (active: {}, interval: {}, window: {}, duration: {:?})",
            params.active, params.interval, params.window, params.duration
        );

        let mut found: Vec<ScanEntry<Device>> = Vec::new();
        let deadline = Instant::now() + params.duration;
        let mut scan_stream = Box::pin(adapter.scan(&[]).await?);

        while let Ok(next) = timeout_at(deadline, scan_stream.next()).await {
            let Some(discovered) = next else {
                info!("Bluetooth scan stream has ended.");
                break;
            };
            let id = discovered.device.id().to_string();
            if found.iter().any(|entry| entry.id == id) {
                continue;
            }
            let name = discovered
                .adv_data
                .local_name
                .clone()
                .or_else(|| discovered.device.name().ok());
            found.push(ScanEntry {
                device: discovered.device,
                name,
                id,
                rssi: discovered.rssi,
            });
        }

        Ok(found)
    }

    async fn clear_scan_results(&self) {
        // Nothing to clear: bluest hands every scan's results to the caller.
    }

    async fn connect(&self, device: &Device, context: LinkContext) -> Result<()> {
        let adapter = self.adapter()?.clone();
        self.watch_connection(adapter.clone(), device.clone(), context.clone());

        if !device.is_connected().await {
            info!("Initiating connection to {}...", device.id());
            if let Err(e) = adapter.connect_device(device).await {
                self.cancel_device_tasks(device);
                return Err(e.into());
            }
        }
        // The event stream may only report later transitions, so record this one here.
        context.on_connect();
        Ok(())
    }

    async fn is_connected(&self, device: &Device) -> bool {
        device.is_connected().await
    }

    async fn disconnect(&self, device: &Device) -> Result<()> {
        self.cancel_device_tasks(device);
        if device.is_connected().await {
            info!("Disconnecting from device {}", device.id());
            self.adapter()?.disconnect_device(device).await?;
        } else {
            debug!("Device {} not connected", device.id());
        }
        Ok(())
    }

    async fn find_service(&self, device: &Device, uuid: Uuid) -> Result<Option<Service>> {
        let services = device.discover_services_with_uuid(uuid).await?;
        if services.is_empty() {
            for service in device.services().await.unwrap_or_default() {
                debug!("Available service: {}", service.uuid());
            }
        }
        Ok(services.into_iter().next())
    }

    async fn find_characteristic(
        &self,
        service: &Service,
        uuid: Uuid,
    ) -> Result<Option<Characteristic>> {
        let characteristics = service.discover_characteristics_with_uuid(uuid).await?;
        Ok(characteristics.into_iter().next())
    }

    async fn can_notify(&self, characteristic: &Characteristic) -> Result<bool> {
        let properties = characteristic.properties().await?;
        Ok(properties.notify || properties.indicate)
    }

    async fn subscribe(
        &self,
        device: &Device,
        characteristic: &Characteristic,
        handler: NotificationHandler,
    ) -> Result<()> {
        let cancel = self.device_token(device);
        let characteristic = characteristic.clone();
        // Subscription failures surface in the log only; the link still counts as up.
        tokio::spawn(async move {
            match characteristic.notify().await {
                Ok(stream) => handler.process_notifications(Box::pin(stream), cancel).await,
                Err(e) => error!("Failed to subscribe to notifications: {}", e),
            }
        });
        Ok(())
    }
}
