use metrics_exporter_prometheus::PrometheusHandle;
use seva_rank::progression::{
    NotificationError, ProgressRecord, ProgressRepository, RankUpNotice, RankUpNotifier,
    RepositoryError, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProgressRepository {
    records: Arc<Mutex<HashMap<UserId, ProgressRecord>>>,
}

impl ProgressRepository for InMemoryProgressRepository {
    fn insert(&self, record: ProgressRecord) -> Result<ProgressRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.user_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ProgressRecord, expected_version: u64) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.user_id) {
            Some(stored) if stored.version == expected_version => {
                *stored = record;
                Ok(())
            }
            Some(stored) => Err(RepositoryError::VersionConflict {
                expected: expected_version,
                found: stored.version,
            }),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &UserId) -> Result<Option<ProgressRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ProgressRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Logs each rank-up and keeps it for the simulation report.
#[derive(Default, Clone)]
pub(crate) struct LoggingRankUpNotifier {
    notices: Arc<Mutex<Vec<RankUpNotice>>>,
}

impl RankUpNotifier for LoggingRankUpNotifier {
    fn notify(&self, notice: RankUpNotice) -> Result<(), NotificationError> {
        info!(
            user_id = %notice.user_id,
            rank = %notice.transition.to,
            points = notice.points,
            "rank-up celebration queued"
        );
        let mut guard = self.notices.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl LoggingRankUpNotifier {
    pub(crate) fn notices(&self) -> Vec<RankUpNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}
