use crate::core::error::PacerError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Strict pacing gate shared by every announce loop
///
/// At most `rate` acquisitions per second, evenly spaced: a grant is never
/// issued earlier than `1/rate` after the previous grant, with no burst
/// allowance. Waiters are admitted first-come-first-served.
pub struct Pacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer allowing `rate` acquisitions per second
    pub fn new(rate: f64) -> Result<Self, PacerError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PacerError::InvalidRate(rate));
        }

        let interval = Duration::try_from_secs_f64(1.0 / rate)
            .map_err(|_| PacerError::InvalidRate(rate))?;

        Ok(Self {
            interval,
            next_slot: Mutex::new(None),
        })
    }

    /// Suspend until a request slot is available
    ///
    /// The slot lock is held across the wait, which is what serializes
    /// concurrent acquirers: tokio's mutex queues them fairly, and each
    /// waiter advances the next free slot only once its own wait elapses.
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;

        let now = Instant::now();
        let slot = match *next_slot {
            Some(at) if at > now => {
                sleep_until(at).await;
                at
            }
            _ => now,
        };

        *next_slot = Some(slot + self.interval);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
