//! # Vote correlation
//!
//! Turns a channel-points redemption into one vote on one idea.
//!
//! The update is a plain read-modify-write against the idea list: load every
//! idea, bump the matched one, write it back to the same position. Two
//! redemptions for the same idea racing each other can both read the old
//! count, and one of the votes is then lost. This is accepted; the list store
//! offers no compare-and-swap and the vote volume is a handful per stream.

use std::sync::Arc;

use domains::{Clock, Idea, IdeaRepository, Redemption, VoteError, VoteReceipt, VoterEvent};
use tracing::{debug, error, info};

use crate::parse::parse_idea_id;

pub struct VoteCorrelator {
    ideas: Arc<dyn IdeaRepository>,
    clock: Arc<dyn Clock>,
}

impl VoteCorrelator {
    pub fn new(ideas: Arc<dyn IdeaRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { ideas, clock }
    }

    /// Records one vote for the idea the redemption text refers to.
    ///
    /// Unparseable text fails before the store is touched. On success exactly
    /// one list element is rewritten; on any failure nothing is.
    pub async fn process_vote(&self, redemption: &Redemption) -> Result<VoteReceipt, VoteError> {
        let Some(candidate) = parse_idea_id(redemption.user_input.as_deref()) else {
            debug!(user_id = %redemption.user_id, input = ?redemption.user_input, "no idea id in redemption");
            return Err(VoteError::InvalidFormat);
        };

        let ideas = self.ideas.load_all().await.map_err(|e| {
            error!(error = %e, "failed to load idea list");
            VoteError::Processing(e)
        })?;

        let (index, mut idea) = find_idea(ideas, &candidate).ok_or_else(|| {
            debug!(%candidate, "no idea matches candidate");
            VoteError::NotFound {
                candidate: candidate.clone(),
            }
        })?;

        idea.record_vote(VoterEvent {
            user_id: redemption.user_id.clone(),
            username: redemption.username.clone(),
            voted_at: self.clock.now(),
            points_spent: redemption.points_spent,
            user_input: redemption.user_input.clone().unwrap_or_default(),
        });

        self.ideas.replace_at(index, &idea).await.map_err(|e| {
            error!(error = %e, idea_id = %idea.id, index, "failed to persist vote");
            VoteError::Processing(e)
        })?;

        info!(
            idea_id = %idea.id,
            user_id = %redemption.user_id,
            votes = idea.votes,
            "vote recorded"
        );

        Ok(VoteReceipt {
            idea_id: idea.id,
            votes: idea.votes,
            voter_count: idea.voters.len(),
        })
    }
}

/// First idea, in list order, whose id equals `candidate` or ends with it.
///
/// Exact and suffix checks run together per idea, so an earlier suffix match
/// wins over a later exact match.
pub fn find_idea(ideas: Vec<Idea>, candidate: &str) -> Option<(usize, Idea)> {
    ideas
        .into_iter()
        .enumerate()
        .find(|(_, idea)| idea.matches(candidate))
}
