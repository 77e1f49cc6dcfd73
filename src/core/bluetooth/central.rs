//! The seam between the link and the platform's BLE central stack

use anyhow::Result;
use uuid::Uuid;

use crate::core::bluetooth::context::LinkContext;
use crate::core::bluetooth::notification::NotificationHandler;
use crate::core::bluetooth::types::{ScanEntry, ScanParams};

/// BLE central operations the link needs from the radio stack
#[async_trait::async_trait]
pub trait BleCentral: Send + Sync {
    /// Handle for a discovered or connected peripheral
    type Device: Clone + Send + Sync + 'static;
    /// Handle for a remote GATT service
    type Service: Send + Sync;
    /// Handle for a remote GATT characteristic
    type Characteristic: Send + Sync;

    /// Activate the radio. Calling it again is a no-op.
    async fn init(&self) -> Result<()>;

    /// Run one bounded scan and return every device seen, in discovery order
    async fn scan(&self, params: &ScanParams) -> Result<Vec<ScanEntry<Self::Device>>>;

    /// Forget the results of the last scan, on stacks that cache them
    async fn clear_scan_results(&self);

    /// Connect to `device`, routing its connect/disconnect events into `context`
    async fn connect(&self, device: &Self::Device, context: LinkContext) -> Result<()>;

    /// Whether the stack still holds a live link to `device`
    async fn is_connected(&self, device: &Self::Device) -> bool;

    /// Request a disconnect and stop any tasks attached to `device`
    async fn disconnect(&self, device: &Self::Device) -> Result<()>;

    /// Look up a primary service by UUID
    async fn find_service(&self, device: &Self::Device, uuid: Uuid) -> Result<Option<Self::Service>>;

    /// Look up a characteristic of `service` by UUID
    async fn find_characteristic(
        &self,
        service: &Self::Service,
        uuid: Uuid,
    ) -> Result<Option<Self::Characteristic>>;

    /// Whether the characteristic can send notifications
    async fn can_notify(&self, characteristic: &Self::Characteristic) -> Result<bool>;

    /// Subscribe to notifications, delivering each payload to `handler`
    async fn subscribe(
        &self,
        device: &Self::Device,
        characteristic: &Self::Characteristic,
        handler: NotificationHandler,
    ) -> Result<()>;
}
