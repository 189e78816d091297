//! Idea box: validation, creation and the new-idea ping.

use std::sync::Arc;

use domains::{Clock, DomainError, Idea, IdeaNotifier, IdeaRepository, Result, MIN_IDEA_LEN};
use tracing::{info, warn};

pub struct IdeaSubmissionService {
    ideas: Arc<dyn IdeaRepository>,
    notifier: Arc<dyn IdeaNotifier>,
    clock: Arc<dyn Clock>,
}

impl IdeaSubmissionService {
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        notifier: Arc<dyn IdeaNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ideas,
            notifier,
            clock,
        }
    }

    /// Validates and appends a new idea, then notifies.
    ///
    /// The id is the submission time in milliseconds, so two ideas submitted
    /// in the same millisecond share an id. Viewers vote by typing the last
    /// six digits of that id.
    pub async fn submit(&self, username: &str, text: &str) -> Result<Idea> {
        let username = username.trim();
        let text = text.trim();

        if username.is_empty() {
            return Err(DomainError::Validation("Username is required".into()));
        }
        if text.chars().count() < MIN_IDEA_LEN {
            return Err(DomainError::Validation(format!(
                "Idea must be at least {MIN_IDEA_LEN} characters"
            )));
        }

        let idea = Idea::new(username, text, self.clock.now());
        self.ideas.append(&idea).await?;
        info!(idea_id = %idea.id, username = %idea.username, "idea submitted");

        // A failed ping must not lose the idea.
        if let Err(e) = self.notifier.idea_submitted(&idea).await {
            warn!(error = %e, idea_id = %idea.id, "new-idea notification failed");
        }

        Ok(idea)
    }

    /// All ideas in submission order.
    pub async fn list(&self) -> Result<Vec<Idea>> {
        self.ideas.load_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domains::{MockClock, MockIdeaNotifier, MockIdeaRepository};

    fn clock() -> Arc<MockClock> {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Utc.timestamp_millis_opt(1_733_333_333_333).unwrap());
        Arc::new(clock)
    }

    fn quiet_notifier() -> Arc<MockIdeaNotifier> {
        let mut notifier = MockIdeaNotifier::new();
        notifier.expect_idea_submitted().returning(|_| Ok(()));
        Arc::new(notifier)
    }

    #[tokio::test]
    async fn test_submit_appends_trimmed_idea() {
        let mut repo = MockIdeaRepository::new();
        repo.expect_append()
            .withf(|idea| {
                idea.id == "1733333333333"
                    && idea.username == "alice"
                    && idea.idea == "play the game blindfolded"
                    && idea.votes == 0
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = IdeaSubmissionService::new(Arc::new(repo), quiet_notifier(), clock());
        let idea = service
            .submit("  alice  ", "  play the game blindfolded ")
            .await
            .unwrap();

        assert_eq!(idea.id, "1733333333333");
        assert_eq!(idea.id_suffix(), "333333");
    }

    #[tokio::test]
    async fn test_submit_rejects_short_idea() {
        let mut repo = MockIdeaRepository::new();
        repo.expect_append().never();
        let service = IdeaSubmissionService::new(Arc::new(repo), quiet_notifier(), clock());

        let err = service.submit("alice", "   too short   ").await.unwrap_err();
        assert!(
            matches!(err, DomainError::Validation(ref msg) if msg == "Idea must be at least 10 characters")
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_username() {
        let mut repo = MockIdeaRepository::new();
        repo.expect_append().never();
        let service = IdeaSubmissionService::new(Arc::new(repo), quiet_notifier(), clock());

        let err = service.submit("   ", "a perfectly fine idea").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg == "Username is required"));
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_fail_submission() {
        let mut repo = MockIdeaRepository::new();
        repo.expect_append().times(1).returning(|_| Ok(()));
        let mut notifier = MockIdeaNotifier::new();
        notifier
            .expect_idea_submitted()
            .times(1)
            .returning(|_| Err(DomainError::Notification("discord returned 500".into())));

        let service = IdeaSubmissionService::new(Arc::new(repo), Arc::new(notifier), clock());
        assert!(service.submit("bob", "speedrun with a dance pad").await.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failure_skips_notification() {
        let mut repo = MockIdeaRepository::new();
        repo.expect_append()
            .returning(|_| Err(DomainError::Storage("down".into())));
        let mut notifier = MockIdeaNotifier::new();
        notifier.expect_idea_submitted().never();

        let service = IdeaSubmissionService::new(Arc::new(repo), Arc::new(notifier), clock());
        let err = service.submit("bob", "speedrun with a dance pad").await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
