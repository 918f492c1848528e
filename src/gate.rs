use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Serializes calls to a rate-limited provider across every task of a scan.
///
/// The lock is held for the whole call, so at most one call is in flight,
/// and each call first waits out whatever is left of the cooldown since the
/// previous one finished.
#[derive(Debug)]
pub struct CooldownGate {
    cooldown: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_call: Mutex::new(None),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub async fn run<F, Fut, T>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.cooldown;
            if ready_at > Instant::now() {
                debug!(
                    "rate limit: waiting {:.1}s before next call",
                    (ready_at - Instant::now()).as_secs_f64()
                );
                sleep_until(ready_at).await;
            }
        }

        // Stamped before the call too, so a caller cancelled mid-call still
        // leaves a cooldown behind.
        *last_call = Some(Instant::now());
        let output = call().await;
        *last_call = Some(Instant::now());
        output
    }
}
