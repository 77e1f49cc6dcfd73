//! Monotonic rate limit for reconnect attempts

use std::time::Duration;
use tokio::time::Instant;

/// Lets at most one reconnect attempt through per interval
#[derive(Debug, Clone)]
pub struct ReconnectGate {
    interval: Duration,
    last_attempt: Option<Instant>,
}

impl ReconnectGate {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_attempt: None }
    }

    /// Returns true and starts a new cooldown if more than `interval` has passed
    /// since the last attempt. The first call always passes.
    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        let ready = self
            .last_attempt
            .is_none_or(|last| now.duration_since(last) > self.interval);
        if ready {
            self.last_attempt = Some(now);
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn one_attempt_per_interval() {
        let mut gate = ReconnectGate::new(Duration::from_millis(2000));
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(!gate.try_acquire());

        // Exactly on the interval is still inside the cooldown.
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!gate.try_acquire());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }
}
