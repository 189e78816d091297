//! Shared fixtures for the cross-crate tests.

use std::sync::Arc;

use auth_adapters::{
    EventSubVerifier, HEADER_MESSAGE_ID, HEADER_MESSAGE_SIGNATURE, HEADER_MESSAGE_TIMESTAMP,
    HEADER_MESSAGE_TYPE,
};
use chrono::{DateTime, TimeZone, Utc};
use domains::{Clock, Idea, IdeaNotifier};
use secrecy::SecretString;
use serde_json::{json, Value};
use services::{IdeaSubmissionService, VoteCorrelator};
use storage_adapters::InMemoryIdeaRepository;

pub const SECRET: &str = "integration-secret";
pub const IDEAS_KEY: &str = "ideas";

pub fn verifier() -> EventSubVerifier {
    EventSubVerifier::new(SecretString::from(SECRET.to_string()))
}

/// A clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2024-12-04T17:28:53.333Z, whose millisecond id ends in `333333`.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.timestamp_millis_opt(1_733_333_333_333).single().unwrap_or_default(),
    ))
}

pub fn idea_with_id(id: &str) -> Idea {
    let mut idea = Idea::new("streamer", "an idea worth voting on", Utc::now());
    idea.id = id.to_string();
    idea
}

pub fn seeded_repo(ideas: &[Idea]) -> Arc<InMemoryIdeaRepository> {
    match InMemoryIdeaRepository::with_ideas(IDEAS_KEY, ideas) {
        Ok(repo) => Arc::new(repo),
        Err(e) => panic!("seeding failed: {e}"),
    }
}

pub fn correlator(repo: Arc<InMemoryIdeaRepository>) -> VoteCorrelator {
    VoteCorrelator::new(repo, fixed_clock())
}

pub fn submissions(
    repo: Arc<InMemoryIdeaRepository>,
    notifier: Arc<dyn IdeaNotifier>,
) -> IdeaSubmissionService {
    IdeaSubmissionService::new(repo, notifier, fixed_clock())
}

/// A channel-points redemption notification body.
pub fn redemption_body(user_id: &str, user_input: &str) -> Value {
    json!({
        "subscription": {
            "type": "channel.channel_points_custom_reward_redemption.add",
            "status": "enabled"
        },
        "event": {
            "user_id": user_id,
            "user_name": format!("viewer{user_id}"),
            "user_input": user_input,
            "reward": { "cost": 100 }
        }
    })
}

/// Header pairs for a correctly signed EventSub delivery.
pub fn signed_headers(message_type: &str, body: &[u8]) -> Vec<(&'static str, String)> {
    let message_id = "integration-msg";
    let timestamp = "2024-12-04T17:28:53Z";
    let signature = match verifier().sign(message_id, timestamp, body) {
        Ok(signature) => signature,
        Err(e) => panic!("signing failed: {e}"),
    };
    vec![
        (HEADER_MESSAGE_ID, message_id.to_string()),
        (HEADER_MESSAGE_TIMESTAMP, timestamp.to_string()),
        (HEADER_MESSAGE_SIGNATURE, signature),
        (HEADER_MESSAGE_TYPE, message_type.to_string()),
    ]
}
