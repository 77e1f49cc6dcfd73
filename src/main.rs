use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use gamepad_link::config::CONFIG_FILE_NAME;
use gamepad_link::{AppConfig, BluestCentral, GamepadLink, logging};
use log::info;
use tokio::time::{MissedTickBehavior, interval};

/// Host loop period
const TICK: Duration = Duration::from_millis(20);

/// How often the sample is reported
const REPORT_EVERY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    // Loaded before the logger exists; its warnings are dropped.
    let config = AppConfig::load_config(&config_path).await?;
    logging::init_logger(&config.log)?;
    info!("Using config {:?}", config_path);

    let mut link = GamepadLink::new(BluestCentral::new(), &config.link);
    link.begin().await;

    let mut tick = interval(TICK);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut report = interval(REPORT_EVERY);
    report.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => link.update().await,
            _ = report.tick() => {
                if link.is_connected() {
                    let sample = link.data();
                    info!(
                        "L({}, {}) R({}, {}) buttons: {:?}",
                        sample.left_x,
                        sample.left_y,
                        sample.right_x,
                        sample.right_y,
                        link.last_buttons()
                    );
                } else {
                    info!("Gamepad not connected ({:?}) - holding neutral", link.state());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    link.disconnect().await;
    Ok(())
}
