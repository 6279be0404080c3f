use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::UserId;
use super::state::{ProgressState, TierTransition};

/// Stored progress for one member. `version` increases on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub state: ProgressState,
    pub version: u64,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ProgressRepository: Send + Sync {
    fn insert(&self, record: ProgressRecord) -> Result<ProgressRecord, RepositoryError>;
    /// Replaces the stored record only if its version still equals `expected_version`.
    fn update(&self, record: ProgressRecord, expected_version: u64) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<ProgressRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ProgressRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record changed concurrently (expected version {expected}, found {found})")]
    VersionConflict { expected: u64, found: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for rank-up celebrations (toasts, push, e-mail).
pub trait RankUpNotifier: Send + Sync {
    fn notify(&self, notice: RankUpNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankUpNotice {
    pub user_id: UserId,
    pub transition: TierTransition,
    pub points: u64,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
