use chrono::Local;
use env_logger::{Builder, Env};
use std::io::Write;

use crate::config::log_config::LogConfig;

/// Timestamp layout for log lines
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Build the logger described by `config`. `RUST_LOG` overrides the configured level.
pub fn build_logger(config: &LogConfig) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(config.level.as_str()));
    if config.timestamps {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                Local::now().format(TIMESTAMP_FORMAT),
                record.level(),
                record.target(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    }
    builder
}

/// Install the global logger. Fails if one is already installed.
pub fn init_logger(config: &LogConfig) -> Result<(), log::SetLoggerError> {
    build_logger(config).try_init()?;
    log::info!("Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected_not_fatal() {
        let config = LogConfig::default();
        let _ = init_logger(&config);
        assert!(init_logger(&config).is_err());
    }
}
