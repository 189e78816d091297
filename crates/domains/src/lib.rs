//! companion/crates/domains/src/lib.rs
//!
//! Idea records, error types and the ports the companion site is built around.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
