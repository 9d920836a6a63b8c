//! Per-host politeness throttle
//!
//! Generalizes the fixed sleep between consecutive requests into a
//! reservation map keyed by `host:port`: any two requests to the same host
//! are spaced by at least the configured delay, while requests to different
//! hosts proceed independently. The first request to a host is immediate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed-delay reservation limiter keyed by host
pub struct HostLimiter {
    delay: Duration,
    /// Scheduled time of the most recent reservation per host
    reservations: Mutex<HashMap<String, Instant>>,
}

impl HostLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            reservations: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until a request to `host` is polite, reserving the slot
    ///
    /// Concurrent callers for the same host are serialized: each reserves
    /// the slot `delay` after the previous one before sleeping, so no two
    /// callers share a slot.
    pub async fn acquire(&self, host: &str) {
        if self.delay.is_zero() {
            return;
        }

        let wait = {
            let mut reservations = self.reservations.lock().unwrap();
            let now = Instant::now();

            match reservations.get(host) {
                Some(&previous) => {
                    let slot = (previous + self.delay).max(now);
                    reservations.insert(host.to_string(), slot);
                    slot - now
                }
                None => {
                    reservations.insert(host.to_string(), now);
                    Duration::ZERO
                }
            }
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
