//! # auth-adapters
//!
//! Twitch EventSub webhook authentication.
//!
//! Twitch signs each delivery with the secret given when the subscription was
//! created: `sha256=` followed by the hex HMAC-SHA256 of
//! `message_id ‖ message_timestamp ‖ raw_body`.

use domains::{DomainError, Result};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_MESSAGE_ID: &str = "twitch-eventsub-message-id";
pub const HEADER_MESSAGE_TIMESTAMP: &str = "twitch-eventsub-message-timestamp";
pub const HEADER_MESSAGE_SIGNATURE: &str = "twitch-eventsub-message-signature";
pub const HEADER_MESSAGE_TYPE: &str = "twitch-eventsub-message-type";

const SIGNATURE_PREFIX: &str = "sha256=";

pub struct EventSubVerifier {
    secret: SecretString,
}

impl EventSubVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self, message_id: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| DomainError::Unauthorized(format!("bad webhook secret: {e}")))?;
        mac.update(message_id.as_bytes());
        mac.update(timestamp.as_bytes());
        mac.update(body);
        Ok(mac)
    }

    /// Checks a delivery's signature header. The comparison is constant-time.
    pub fn verify(
        &self,
        message_id: &str,
        timestamp: &str,
        body: &[u8],
        signature: &str,
    ) -> Result<()> {
        let expected = signature
            .strip_prefix(SIGNATURE_PREFIX)
            .and_then(|digest| hex::decode(digest).ok())
            .ok_or_else(|| DomainError::Unauthorized("malformed signature header".into()))?;

        self.mac(message_id, timestamp, body)?
            .verify_slice(&expected)
            .map_err(|_| {
                debug!(%message_id, "webhook signature mismatch");
                DomainError::Unauthorized("signature mismatch".into())
            })
    }

    /// Produces the header value Twitch would send for this delivery.
    pub fn sign(&self, message_id: &str, timestamp: &str, body: &[u8]) -> Result<String> {
        let digest = self.mac(message_id, timestamp, body)?.finalize().into_bytes();
        Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode(digest)))
    }
}
