//! Sleep abstraction for the retry loop.

use async_trait::async_trait;
use std::time::Duration;

/// Waits between retrieval rounds.
///
/// Only the calling task is suspended; other triggers and the delivery
/// critical section keep running.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
