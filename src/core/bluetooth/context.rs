//! Shared link state handed to the radio stack's callbacks
//! The stack's tasks write into it; the host loop reads it through `GamepadLink`.

use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::report::{InputSample, ReportButtons, ReportParser};

#[derive(Debug, Default)]
struct Shared {
    /// Raw connection flag, driven by connect/disconnect events
    device_connected: AtomicBool,
    sample: Mutex<InputSample>,
    parser: Mutex<ReportParser>,
}

/// Cloneable handle to one link's connection flag and input sample.
///
/// Registered with the central for connection events and notifications, so
/// every callback knows which link it belongs to.
#[derive(Debug, Clone, Default)]
pub struct LinkContext {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic in another holder leaves plain data behind; keep using it.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LinkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection event: the peripheral is linked
    pub fn on_connect(&self) {
        info!("Connected to gamepad");
        self.shared.device_connected.store(true, Ordering::SeqCst);
        lock(&self.shared.sample).connected = true;
    }

    /// Connection event: the peripheral dropped the link
    pub fn on_disconnect(&self) {
        info!("Disconnected from gamepad");
        self.mark_disconnected();
    }

    /// Clear both connection flags
    pub fn mark_disconnected(&self) {
        self.shared.device_connected.store(false, Ordering::SeqCst);
        lock(&self.shared.sample).connected = false;
    }

    /// Clear only the sample's flag, leaving the raw flag to the stack
    pub fn clear_sample_connected(&self) {
        lock(&self.shared.sample).connected = false;
    }

    /// Notification payload: decode it and fold it into the sample
    pub fn on_report(&self, data: &[u8]) {
        let report = lock(&self.shared.parser).parse_data(data);
        match report {
            Some(report) => lock(&self.shared.sample).apply(&report),
            None => debug!("Dropped short report ({} bytes)", data.len()),
        }
    }

    /// Raw connection flag as last reported by the stack
    pub fn device_connected(&self) -> bool {
        self.shared.device_connected.load(Ordering::SeqCst)
    }

    /// Both flags agree that the gamepad is connected
    pub fn is_connected(&self) -> bool {
        self.device_connected() && lock(&self.shared.sample).connected
    }

    /// Copy of the current sample
    pub fn sample(&self) -> InputSample {
        *lock(&self.shared.sample)
    }

    pub fn last_buttons(&self) -> Option<ReportButtons> {
        lock(&self.shared.parser).last_buttons()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_requires_both_flags() {
        let ctx = LinkContext::new();
        assert!(!ctx.is_connected());

        ctx.on_connect();
        assert!(ctx.is_connected());

        ctx.clear_sample_connected();
        assert!(ctx.device_connected());
        assert!(!ctx.is_connected());

        ctx.on_connect();
        ctx.shared.device_connected.store(false, Ordering::SeqCst);
        assert!(ctx.sample().connected);
        assert!(!ctx.is_connected());
    }

    #[test]
    fn disconnect_clears_both_flags() {
        let ctx = LinkContext::new();
        ctx.on_connect();
        ctx.on_disconnect();
        assert!(!ctx.device_connected());
        assert!(!ctx.sample().connected);
    }

    #[test]
    fn reports_update_the_shared_sample() {
        let ctx = LinkContext::new();
        let observer = ctx.clone();

        ctx.on_report(&[0x00, 0x00, 0x01, 0x80, 0x02, 0x00, 0xFE, 0x7F, 0x00, 0x80]);
        let sample = observer.sample();
        assert_eq!((sample.left_x, sample.left_y, sample.right_x, sample.right_y), (-32767, 2, 32766, -32768));

        ctx.on_report(&[1, 2, 3, 4, 5]);
        assert_eq!(observer.sample(), sample);
        assert_eq!(observer.last_buttons().map(|b| b.extra), Some(Some(0)));
    }

    #[test]
    fn sample_is_a_copy() {
        let ctx = LinkContext::new();
        let mut copy = ctx.sample();
        copy.left_x = 1234;
        copy.connected = true;
        assert_ne!(copy, ctx.sample());
        assert_eq!(ctx.sample(), InputSample::default());
    }
}
