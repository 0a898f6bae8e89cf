// Simulated latency. Every wait in the purchase flow goes through a Delay so
// tests can swap in NoDelay or run under tokio's paused clock.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}

pub type SharedDelay = Arc<dyn Delay>;

pub fn tokio_delay() -> SharedDelay {
    Arc::new(TokioDelay)
}

pub fn no_delay() -> SharedDelay {
    Arc::new(NoDelay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_delay_advances_paused_clock() {
        let start = Instant::now();
        TokioDelay.wait(Duration::from_millis(2000)).await;
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_does_not_advance_clock() {
        let start = Instant::now();
        NoDelay.wait(Duration::from_secs(60)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
