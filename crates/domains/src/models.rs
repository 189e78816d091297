//! # Domain Models
//!
//! Records as they live in the idea list. Field names are camelCase on the
//! wire because the list is shared with the site's frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of trailing id characters a viewer may type to vote for an idea.
pub const ID_SUFFIX_LEN: usize = 6;

/// Channel-points cost assumed when a redemption does not carry one.
pub const DEFAULT_POINTS_SPENT: u64 = 100;

/// Minimum length of an idea's text after trimming.
pub const MIN_IDEA_LEN: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    #[default]
    Pending,
}

/// One viewer-submitted idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    /// Submission time in milliseconds since the epoch, kept as a string.
    pub id: String,
    pub username: String,
    pub idea: String,
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub voters: Vec<VoterEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_vote_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Fields written by other handlers; carried through a vote untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single accepted vote, appended to [`Idea::voters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterEvent {
    pub user_id: String,
    pub username: String,
    pub voted_at: DateTime<Utc>,
    pub points_spent: u64,
    pub user_input: String,
}

/// Redemption metadata handed to the correlator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub user_id: String,
    pub username: String,
    pub user_input: Option<String>,
    pub points_spent: u64,
}

/// Outcome of an accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub idea_id: String,
    pub votes: u64,
    pub voter_count: usize,
}

impl Idea {
    /// Builds a fresh pending idea. `username` and `idea` are stored trimmed.
    pub fn new(username: &str, idea: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            username: username.trim().to_string(),
            idea: idea.trim().to_string(),
            status: IdeaStatus::Pending,
            votes: 0,
            voters: Vec::new(),
            last_vote_at: None,
            created_at: Some(now),
            extra: Map::new(),
        }
    }

    /// The last [`ID_SUFFIX_LEN`] characters of the id, or the whole id when shorter.
    pub fn id_suffix(&self) -> &str {
        let start = self
            .id
            .char_indices()
            .rev()
            .nth(ID_SUFFIX_LEN - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.id[start..]
    }

    /// Exact id match or suffix match, both on strings.
    pub fn matches(&self, candidate: &str) -> bool {
        self.id == candidate || self.id_suffix() == candidate
    }

    /// Counts one vote. `votes` and `voters` always move together.
    pub fn record_vote(&mut self, event: VoterEvent) {
        self.last_vote_at = Some(event.voted_at);
        self.votes += 1;
        self.voters.push(event);
    }
}
