//! # Twitch EventSub webhook
//!
//! One endpoint receives three kinds of delivery, told apart by the
//! `Twitch-Eventsub-Message-Type` header:
//!
//! - `webhook_callback_verification`: echo `challenge` as plain text
//! - `notification`: a channel-points redemption, i.e. a vote
//! - `revocation`: the subscription was dropped; acknowledge and log
//!
//! The signature is checked before the body is even parsed.

use auth_adapters::{
    HEADER_MESSAGE_ID, HEADER_MESSAGE_SIGNATURE, HEADER_MESSAGE_TIMESTAMP, HEADER_MESSAGE_TYPE,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domains::{Redemption, VoteReceipt, DEFAULT_POINTS_SPENT};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

pub const REDEMPTION_ADD: &str = "channel.channel_points_custom_reward_redemption.add";

#[derive(Debug, Deserialize)]
pub struct EventSubEnvelope {
    pub challenge: Option<String>,
    pub subscription: Option<Subscription>,
    pub event: Option<RedemptionEvent>,
}

#[derive(Debug, Deserialize)]
pub struct Subscription {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedemptionEvent {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    /// Anything other than a JSON string reads as no input at all.
    #[serde(default, deserialize_with = "string_or_none")]
    pub user_input: Option<String>,
    pub reward: Option<Reward>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(input)) => Some(input),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
pub struct Reward {
    pub cost: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Verification,
    Notification,
    Revocation,
    Other(String),
}

impl MessageType {
    /// Uses the header when present, otherwise guesses from the body.
    pub fn resolve(header: Option<&str>, envelope: &EventSubEnvelope) -> Self {
        match header {
            Some("webhook_callback_verification") => MessageType::Verification,
            Some("notification") => MessageType::Notification,
            Some("revocation") => MessageType::Revocation,
            Some(other) => MessageType::Other(other.to_string()),
            None if envelope.challenge.is_some() => MessageType::Verification,
            None => MessageType::Notification,
        }
    }
}

impl From<RedemptionEvent> for Redemption {
    fn from(event: RedemptionEvent) -> Self {
        Redemption {
            user_id: event.user_id,
            username: event.user_name,
            user_input: event.user_input,
            points_spent: event
                .reward
                .and_then(|reward| reward.cost)
                .unwrap_or(DEFAULT_POINTS_SPENT),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoteAck {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: VoteReceipt,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn authenticate(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), ApiError> {
    let rejected = || ApiError::Unauthorized("Invalid signature".into());

    let (Some(id), Some(timestamp), Some(signature)) = (
        header(headers, HEADER_MESSAGE_ID),
        header(headers, HEADER_MESSAGE_TIMESTAMP),
        header(headers, HEADER_MESSAGE_SIGNATURE),
    ) else {
        warn!("webhook delivery without signature headers");
        return Err(rejected());
    };

    state
        .verifier
        .verify(id, timestamp, body, signature)
        .map_err(|e| {
            warn!(error = %e, message_id = %id, "webhook signature rejected");
            rejected()
        })
}

pub async fn twitch_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    authenticate(&state, &headers, &body)?;

    let envelope: EventSubEnvelope = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Malformed payload".into()))?;

    match MessageType::resolve(header(&headers, HEADER_MESSAGE_TYPE), &envelope) {
        MessageType::Verification => {
            let challenge = envelope
                .challenge
                .ok_or_else(|| ApiError::BadRequest("Missing challenge".into()))?;
            info!(
                subscription = ?envelope.subscription.as_ref().map(|s| &s.kind),
                "webhook verification challenge answered"
            );
            Ok((StatusCode::OK, [(CONTENT_TYPE, "text/plain")], challenge).into_response())
        }
        MessageType::Revocation => {
            warn!(
                status = ?envelope.subscription.as_ref().and_then(|s| s.status.as_deref()),
                "eventsub subscription revoked"
            );
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        MessageType::Other(kind) => {
            warn!(%kind, "ignoring unknown eventsub message type");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        MessageType::Notification => handle_redemption(&state, envelope).await,
    }
}

async fn handle_redemption(state: &AppState, envelope: EventSubEnvelope) -> Result<Response, ApiError> {
    if let Some(subscription) = &envelope.subscription {
        if subscription.kind != REDEMPTION_ADD {
            warn!(kind = %subscription.kind, "ignoring notification for another subscription type");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    }

    let event = envelope
        .event
        .ok_or_else(|| ApiError::BadRequest("Malformed payload".into()))?;
    let redemption = Redemption::from(event);

    match state.correlator.process_vote(&redemption).await {
        Ok(receipt) => {
            state.metrics.record_vote("accepted");
            Ok(Json(VoteAck {
                success: true,
                receipt,
            })
            .into_response())
        }
        Err(err) => {
            state.metrics.record_vote(err.kind());
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> EventSubEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_message_type_from_header() {
        let env = envelope(json!({}));
        assert_eq!(
            MessageType::resolve(Some("webhook_callback_verification"), &env),
            MessageType::Verification
        );
        assert_eq!(MessageType::resolve(Some("notification"), &env), MessageType::Notification);
        assert_eq!(MessageType::resolve(Some("revocation"), &env), MessageType::Revocation);
        assert_eq!(
            MessageType::resolve(Some("mystery"), &env),
            MessageType::Other("mystery".into())
        );
    }

    #[test]
    fn test_message_type_inferred_from_body() {
        assert_eq!(
            MessageType::resolve(None, &envelope(json!({ "challenge": "abc" }))),
            MessageType::Verification
        );
        assert_eq!(
            MessageType::resolve(None, &envelope(json!({ "event": {} }))),
            MessageType::Notification
        );
    }

    #[test]
    fn test_redemption_defaults_points_spent() {
        let env = envelope(json!({
            "event": { "user_id": "7", "user_name": "kat", "user_input": "idea 5" }
        }));
        let redemption = Redemption::from(env.event.unwrap());
        assert_eq!(redemption.points_spent, DEFAULT_POINTS_SPENT);
        assert_eq!(redemption.user_input.as_deref(), Some("idea 5"));
        assert_eq!(redemption.username, "kat");
    }

    #[test]
    fn test_redemption_uses_reward_cost() {
        let env = envelope(json!({
            "event": { "user_id": "7", "user_name": "kat", "user_input": "5", "reward": { "cost": 2500 } }
        }));
        assert_eq!(Redemption::from(env.event.unwrap()).points_spent, 2500);
    }

    #[test]
    fn test_non_string_user_input_reads_as_missing() {
        for input in [json!(5), json!(["5"]), json!(true), json!({ "id": "5" })] {
            let env = envelope(json!({
                "event": { "user_id": "7", "user_name": "kat", "user_input": input }
            }));
            assert_eq!(env.event.unwrap().user_input, None);
        }
    }

    #[test]
    fn test_vote_ack_shape() {
        let ack = VoteAck {
            success: true,
            receipt: VoteReceipt {
                idea_id: "1733333333333".into(),
                votes: 3,
                voter_count: 3,
            },
        };
        assert_eq!(
            serde_json::to_value(ack).unwrap(),
            json!({ "success": true, "ideaId": "1733333333333", "votes": 3, "voterCount": 3 })
        );
    }
}
