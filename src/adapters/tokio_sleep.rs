//! Tokio-backed [`Sleeper`].

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::Sleeper;

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
