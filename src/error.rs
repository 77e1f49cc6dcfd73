//! Error types for the gamepad link
//! Every variant is handled inside the link; none of them reach the host loop.

use thiserror::Error;
use uuid::Uuid;

/// Reasons a scan-and-connect attempt can fail
#[derive(Debug, Error)]
pub enum LinkError {
    /// No device advertising the expected name was seen during the scan window
    #[error("gamepad {name:?} not found in scan")]
    NotFound { name: String },

    /// The peripheral refused or timed out the link handshake
    #[error("connection refused: {0}")]
    ConnectRefused(#[source] anyhow::Error),

    /// The peripheral does not expose the HID service
    #[error("service not found: {0}")]
    ServiceMissing(Uuid),

    /// The HID service does not expose the input report characteristic
    #[error("input characteristic not found: {0}")]
    CharacteristicMissing(Uuid),

    /// The input report characteristic cannot notify
    #[error("characteristic {0} does not support notifications")]
    NotifyUnsupported(Uuid),

    /// The radio stack rejected a scan or GATT operation
    #[error("transport failure: {0}")]
    Transport(#[from] anyhow::Error),
}

pub type LinkResult<T> = std::result::Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_piece() {
        let err = LinkError::NotFound { name: "BLE Gamepad".into() };
        assert_eq!(err.to_string(), "gamepad \"BLE Gamepad\" not found in scan");

        let uuid = Uuid::from_u128(0x00001812_0000_1000_8000_00805f9b34fb);
        let err = LinkError::ServiceMissing(uuid);
        assert!(err.to_string().contains("00001812"));
    }

    #[test]
    fn stack_errors_convert_into_transport() {
        let err: LinkError = anyhow::anyhow!("adapter powered off").into();
        assert!(matches!(err, LinkError::Transport(_)));
        assert_eq!(err.to_string(), "transport failure: adapter powered off");
    }

    #[test]
    fn refused_handshake_is_not_a_transport_failure() {
        let err = LinkError::ConnectRefused(anyhow::anyhow!("timed out"));
        assert!(!matches!(err, LinkError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused: timed out");
    }
}
