use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::UserId;
use super::engine::{ProgressionError, RankEngine};
use super::repository::{
    ProgressRecord, ProgressRepository, RankUpNotice, RankUpNotifier, RepositoryError,
};
use super::state::{ProgressState, TierTransition};
use super::views::LeaderboardEntry;

const MAX_WRITE_ATTEMPTS: usize = 3;

/// Service composing the rank engine with progress storage and rank-up hooks.
pub struct ProgressService<R, N> {
    engine: Arc<RankEngine>,
    repository: Arc<R>,
    notifier: Arc<N>,
}

/// Outcome of recording one activity for a member.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReceipt {
    pub user_id: UserId,
    pub earned: u64,
    pub state: ProgressState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<TierTransition>,
    /// False when a rank-up happened but the notifier could not deliver it.
    pub notified: bool,
}

impl<R, N> ProgressService<R, N>
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    pub fn new(engine: Arc<RankEngine>, repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            engine,
            repository,
            notifier,
        }
    }

    pub fn engine(&self) -> &RankEngine {
        &self.engine
    }

    /// Start tracking a member at the baseline tier.
    pub fn enroll(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        let record = ProgressRecord {
            user_id,
            state: self.engine.initial_state(now),
            version: 0,
        };
        let stored = self.repository.insert(record)?;
        debug!(user_id = %stored.user_id, "enrolled member in rank progression");
        Ok(stored)
    }

    /// Credit `units` people helped to a member and persist the new standing.
    ///
    /// Concurrent writers are detected through the record version; the read,
    /// apply, write cycle is retried a bounded number of times.
    pub fn record_impact(
        &self,
        user_id: &UserId,
        units: i64,
        now: DateTime<Utc>,
    ) -> Result<ImpactReceipt, ProgressServiceError> {
        let mut attempt = 1;
        let outcome = loop {
            let record = self
                .repository
                .fetch(user_id)?
                .ok_or(RepositoryError::NotFound)?;

            let outcome = self.engine.apply_impact(&record.state, units, now)?;
            let updated = ProgressRecord {
                user_id: record.user_id.clone(),
                state: outcome.state.clone(),
                version: record.version + 1,
            };

            match self.repository.update(updated, record.version) {
                Ok(()) => break outcome,
                Err(RepositoryError::VersionConflict { expected, found })
                    if attempt < MAX_WRITE_ATTEMPTS =>
                {
                    debug!(%user_id, attempt, expected, found, "retrying progress write");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        };

        let mut notified = true;
        if let Some(transition) = &outcome.transition {
            info!(
                %user_id,
                from = %transition.from,
                to = %transition.to,
                skipped = transition.skipped.len(),
                points = outcome.state.points(),
                "member ranked up"
            );
            let notice = RankUpNotice {
                user_id: user_id.clone(),
                transition: transition.clone(),
                points: outcome.state.points(),
                achieved_at: now,
            };
            if let Err(err) = self.notifier.notify(notice) {
                warn!(%user_id, error = %err, "rank-up notification failed");
                notified = false;
            }
        }

        Ok(ImpactReceipt {
            user_id: user_id.clone(),
            earned: outcome.earned,
            state: outcome.state,
            transition: outcome.transition,
            notified,
        })
    }

    pub fn get(&self, user_id: &UserId) -> Result<ProgressRecord, ProgressServiceError> {
        let record = self
            .repository
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Members ordered by points, highest first; ties break on user id.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ProgressServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|a, b| {
            b.state
                .points()
                .cmp(&a.state.points())
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        Ok(records
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, record)| LeaderboardEntry {
                position: index + 1,
                points: record.state.points(),
                rank: record.state.current_tier().to_string(),
                user_id: record.user_id,
            })
            .collect())
    }
}

/// Error raised by the progress service.
#[derive(Debug, thiserror::Error)]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
