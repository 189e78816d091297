//! # storage-adapters
//!
//! `IdeaRepository` backends. The in-memory list is always compiled; Redis is
//! behind the `redis` feature.

pub mod codec;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::InMemoryIdeaRepository;
#[cfg(feature = "redis")]
pub use self::redis::RedisIdeaRepository;
