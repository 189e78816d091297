//! Prometheus counters for the vote webhook and the idea box.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct VoteLabels {
    pub outcome: String,
}

pub struct Metrics {
    registry: Registry,
    votes: Family<VoteLabels, Counter>,
    ideas_submitted: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let votes = Family::<VoteLabels, Counter>::default();
        let ideas_submitted = Counter::default();

        registry.register(
            "companion_votes",
            "Channel-points vote redemptions by outcome",
            votes.clone(),
        );
        registry.register(
            "companion_ideas_submitted",
            "Ideas accepted by the idea box",
            ideas_submitted.clone(),
        );

        Self {
            registry,
            votes,
            ideas_submitted,
        }
    }

    /// `outcome` is `accepted` or a `VoteError::kind`.
    pub fn record_vote(&self, outcome: &str) {
        self.votes
            .get_or_create(&VoteLabels {
                outcome: outcome.to_string(),
            })
            .inc();
    }

    pub fn record_idea_submitted(&self) {
        self.ideas_submitted.inc();
    }

    /// OpenMetrics text exposition.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
