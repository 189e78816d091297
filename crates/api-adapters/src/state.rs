use std::sync::Arc;

use auth_adapters::EventSubVerifier;
use services::{IdeaSubmissionService, VoteCorrelator};

use crate::metrics::Metrics;

/// Shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub correlator: Arc<VoteCorrelator>,
    pub submissions: Arc<IdeaSubmissionService>,
    pub verifier: Arc<EventSubVerifier>,
    pub metrics: Arc<Metrics>,
}
