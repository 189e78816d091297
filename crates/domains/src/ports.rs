//! # Ports
//!
//! Adapters implement these traits; services only ever see the traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Idea;

/// The ordered idea list. Positions are storage addresses, not identities.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// Every idea, in insertion order.
    async fn load_all(&self) -> Result<Vec<Idea>>;

    /// Overwrites the element at `index` in place.
    async fn replace_at(&self, index: usize, idea: &Idea) -> Result<()>;

    /// Appends to the end of the list.
    async fn append(&self, idea: &Idea) -> Result<()>;
}

/// Tells someone a new idea arrived.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdeaNotifier: Send + Sync {
    async fn idea_submitted(&self, idea: &Idea) -> Result<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
