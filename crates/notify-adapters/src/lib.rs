//! # notify-adapters
//!
//! `IdeaNotifier` implementations. Discord sits behind the `discord` feature.

use async_trait::async_trait;
use domains::{Idea, IdeaNotifier, Result};
use tracing::debug;

#[cfg(feature = "discord")]
pub mod discord;

#[cfg(feature = "discord")]
pub use discord::DiscordNotifier;

/// Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl IdeaNotifier for NoopNotifier {
    async fn idea_submitted(&self, idea: &Idea) -> Result<()> {
        debug!(idea_id = %idea.id, "no notifier configured");
        Ok(())
    }
}
