//! Notification handling for the gamepad
//! This module turns the input report notification stream into sample updates

use futures_util::{Stream, StreamExt};
use log::{debug, error, info};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

use crate::core::bluetooth::context::LinkContext;

/// Notification handler for gamepad input reports
#[derive(Clone)]
pub struct NotificationHandler {
    context: LinkContext,
}

impl NotificationHandler {
    /// Create a handler that feeds reports into `context`
    pub fn new(context: LinkContext) -> Self {
        Self { context }
    }

    /// Handle one notification payload
    pub fn handle(&self, value: &[u8]) {
        debug!("Received gamepad report: {:02X?}", value);
        self.context.on_report(value);
    }

    /// Drain a notification stream until it ends, fails, or `cancel` fires
    pub async fn process_notifications<S, E>(&self, mut stream: S, cancel: CancellationToken)
    where
        S: Stream<Item = Result<Vec<u8>, E>> + Unpin,
        E: Display,
    {
        info!("Listening for gamepad notifications...");
        loop {
            tokio::select! {
                result = stream.next() => {
                    match result {
                        Some(Ok(value)) => self.handle(&value),
                        Some(Err(e)) => {
                            error!("Error in notification stream: {}", e);
                            break;
                        }
                        None => break,
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }
        info!("Notification stream ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn stream_reports_reach_the_sample() {
        let context = LinkContext::new();
        let handler = NotificationHandler::new(context.clone());
        let reports: Vec<Result<Vec<u8>, String>> = vec![
            Ok(vec![0, 0, 0x10, 0, 0x20, 0, 0x30, 0, 0x40, 0]),
            Ok(vec![0xFF; 3]),
        ];

        handler.process_notifications(stream::iter(reports), CancellationToken::new()).await;

        let sample = context.sample();
        assert_eq!((sample.left_x, sample.left_y, sample.right_x, sample.right_y), (16, 32, 48, 64));
    }

    #[tokio::test]
    async fn stream_error_stops_processing() {
        let context = LinkContext::new();
        let handler = NotificationHandler::new(context.clone());
        let reports: Vec<Result<Vec<u8>, String>> = vec![
            Err("link lost".into()),
            Ok(vec![0, 0, 0x10, 0, 0x20, 0, 0x30, 0, 0x40, 0]),
        ];

        handler.process_notifications(stream::iter(reports), CancellationToken::new()).await;
        assert_eq!(context.sample().left_x, 0);
    }

    #[tokio::test]
    async fn cancellation_ends_a_pending_stream() {
        let handler = NotificationHandler::new(LinkContext::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        handler
            .process_notifications(stream::pending::<Result<Vec<u8>, String>>(), cancel)
            .await;
    }
}
