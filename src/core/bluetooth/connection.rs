//! Bluetooth connection handling for the gamepad
//! This module connects to a selected device and subscribes to its input reports

use log::{info, warn};
use uuid::Uuid;

use crate::core::bluetooth::central::BleCentral;
use crate::core::bluetooth::context::LinkContext;
use crate::core::bluetooth::notification::NotificationHandler;
use crate::error::{LinkError, LinkResult};

/// Connection manager for the gamepad
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    service_uuid: Uuid,
    input_char_uuid: Uuid,
}

impl ConnectionManager {
    pub fn new(service_uuid: Uuid, input_char_uuid: Uuid) -> Self {
        Self { service_uuid, input_char_uuid }
    }

    /// Connect to `device`, find the input report characteristic and subscribe to it.
    ///
    /// A refused handshake comes back as [`LinkError::ConnectRefused`]. Any
    /// failure after the link is up disconnects again and clears the
    /// context's flags before returning.
    pub async fn try_connect<C: BleCentral>(
        &self,
        central: &C,
        device: &C::Device,
        context: &LinkContext,
    ) -> LinkResult<()> {
        central
            .connect(device, context.clone())
            .await
            .map_err(LinkError::ConnectRefused)?;
        info!("Connected to gamepad device");

        if let Err(e) = self.subscribe_input(central, device, context).await {
            self.teardown(central, device, context).await;
            return Err(e);
        }
        Ok(())
    }

    async fn subscribe_input<C: BleCentral>(
        &self,
        central: &C,
        device: &C::Device,
        context: &LinkContext,
    ) -> LinkResult<()> {
        let service = central
            .find_service(device, self.service_uuid)
            .await?
            .ok_or(LinkError::ServiceMissing(self.service_uuid))?;
        info!("Found HID service: {}", self.service_uuid);

        let input_char = central
            .find_characteristic(&service, self.input_char_uuid)
            .await?
            .ok_or(LinkError::CharacteristicMissing(self.input_char_uuid))?;
        info!("Found input characteristic: {}", self.input_char_uuid);

        if !central.can_notify(&input_char).await? {
            return Err(LinkError::NotifyUnsupported(self.input_char_uuid));
        }

        central
            .subscribe(device, &input_char, NotificationHandler::new(context.clone()))
            .await?;
        info!("Registered for gamepad notifications");
        Ok(())
    }

    /// Disconnect from the gamepad and clear the connection flags
    pub async fn teardown<C: BleCentral>(&self, central: &C, device: &C::Device, context: &LinkContext) {
        if let Err(e) = central.disconnect(device).await {
            warn!("Disconnect during teardown failed: {}", e);
        }
        context.mark_disconnected();
    }
}
