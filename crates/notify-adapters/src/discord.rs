//! Discord channel webhook.

use std::time::Duration;

use async_trait::async_trait;
use domains::{DomainError, Idea, IdeaNotifier, Result, ID_SUFFIX_LEN};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;

// Discord rejects embed descriptions longer than this.
const MAX_DESCRIPTION: usize = 4096;
const EMBED_COLOR: u32 = 0x9146FF;

pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: SecretString,
}

impl DiscordNotifier {
    pub fn new(webhook_url: SecretString, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Notification(format!("build http client: {e}")))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

/// Message body posted for a new idea.
pub fn idea_payload(idea: &Idea) -> Value {
    let description: String = idea.idea.chars().take(MAX_DESCRIPTION).collect();

    json!({
        "embeds": [{
            "title": "New idea submitted",
            "description": description,
            "color": EMBED_COLOR,
            "fields": [
                { "name": "From", "value": idea.username, "inline": true },
                { "name": format!("Vote code (last {ID_SUFFIX_LEN} digits)"), "value": idea.id_suffix(), "inline": true },
                { "name": "Idea ID", "value": idea.id, "inline": false },
            ],
            "timestamp": idea.created_at,
        }]
    })
}

#[async_trait]
impl IdeaNotifier for DiscordNotifier {
    async fn idea_submitted(&self, idea: &Idea) -> Result<()> {
        let response = self
            .client
            .post(self.webhook_url.expose_secret())
            .json(&idea_payload(idea))
            .send()
            .await
            .map_err(|e| DomainError::Notification(format!("discord request: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Notification(format!("discord returned {status}")));
        }

        debug!(idea_id = %idea.id, "discord notified");
        Ok(())
    }
}
