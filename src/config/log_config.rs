use serde::{Deserialize, Serialize};

/// Logger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set, e.g. "info" or "gamepad_link=debug"
    pub level: String,
    /// Prefix each line with a local timestamp
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            timestamps: true,
        }
    }
}
