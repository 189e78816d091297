//! # services
//!
//! Application logic for the companion site: vote correlation and the idea box.

pub mod correlator;
pub mod parse;
pub mod submission;

pub use correlator::{find_idea, VoteCorrelator};
pub use parse::parse_idea_id;
pub use submission::IdeaSubmissionService;
