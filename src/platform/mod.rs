pub mod telegram;

use async_trait::async_trait;

use crate::error::BotResult;

/// Outbound messaging capability: deliver text to a destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Fails with `BotError::Delivery` when the text could not be sent.
    async fn send(&self, destination: &str, text: &str) -> BotResult<()>;
}
