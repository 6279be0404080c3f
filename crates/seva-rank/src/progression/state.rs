use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tier reached, in the order it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankHistoryEntry {
    pub tier: String,
    pub achieved_at: DateTime<Utc>,
    pub points_at_achievement: u64,
}

/// Accumulated points, the tier they map to, and the append-only rank history.
///
/// Values are produced by [`RankEngine`](super::RankEngine); callers persist
/// them but never edit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub(crate) points: u64,
    pub(crate) current_tier: String,
    pub(crate) history: Vec<RankHistoryEntry>,
}

impl ProgressState {
    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn current_tier(&self) -> &str {
        &self.current_tier
    }

    pub fn history(&self) -> &[RankHistoryEntry] {
        &self.history
    }
}

/// A change of tier caused by one batch of earned points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTransition {
    pub from: String,
    pub to: String,
    /// Tiers passed through on the way to `to`, in ladder order.
    pub skipped: Vec<String>,
}

impl TierTransition {
    /// Every tier entered by this transition, ending with `to`.
    pub fn reached(&self) -> impl Iterator<Item = &str> {
        self.skipped
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.to.as_str()))
    }
}
