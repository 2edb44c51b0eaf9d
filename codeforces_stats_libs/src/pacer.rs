use tokio::sync::Mutex;
use tokio::time::{self, Duration, Instant};

/// Serializes calls to a rate-limited upstream endpoint with a minimum
/// interval between consecutive requests.
///
/// One instance is shared across the whole process; the mutex is held through
/// the wait so concurrent acquirers queue up and each gets its own fully
/// spaced slot.
pub struct RequestPacer {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RequestPacer {
    pub fn new(interval: Duration) -> Self {
        RequestPacer {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Waits until the next request slot is available and claims it.
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        if *next_slot > now {
            time::sleep_until(*next_slot).await;
        }
        *next_slot = Instant::now() + self.interval;
    }
}
