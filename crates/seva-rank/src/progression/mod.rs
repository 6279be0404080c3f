//! Seva points and rank progression.
//!
//! [`RankEngine`] holds the pure rules: people helped become points, points
//! map onto a validated [`Ladder`], and each call that crosses thresholds
//! yields a [`TierTransition`] plus one history entry per tier entered.
//! [`ProgressService`] wires the engine to storage and rank-up notifications.

pub mod domain;
pub mod engine;
pub mod ladder;
mod ladders;
pub mod repository;
pub mod router;
pub mod service;
pub mod state;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{RankTier, TierPresentation, UserId};
pub use engine::{ImpactOutcome, ProgressionError, RankEngine, POINTS_PER_PERSON};
pub use ladder::{Ladder, LadderError, RankProgress};
pub use repository::{
    NotificationError, ProgressRecord, ProgressRepository, RankUpNotice, RankUpNotifier,
    RepositoryError,
};
pub use router::{progress_router, ImpactRequest, LeaderboardQuery};
pub use service::{ImpactReceipt, ProgressService, ProgressServiceError};
pub use state::{ProgressState, RankHistoryEntry, TierTransition};
pub use views::{LadderView, LeaderboardEntry, ProgressView, TierView};
