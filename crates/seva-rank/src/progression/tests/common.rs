use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::progression::domain::{RankTier, UserId};
use crate::progression::repository::{
    NotificationError, ProgressRecord, ProgressRepository, RankUpNotice, RankUpNotifier,
    RepositoryError,
};
use crate::progression::{Ladder, ProgressService, RankEngine};

/// Sevak 0, Mavla 10, Talveer 100.
pub(super) fn three_tier_ladder() -> Ladder {
    Ladder::new(vec![
        RankTier::new("Sevak", 0),
        RankTier::new("Mavla", 10),
        RankTier::new("Talveer", 100),
    ])
    .expect("valid ladder")
}

pub(super) fn engine() -> RankEngine {
    RankEngine::new(three_tier_ladder(), 5).expect("positive multiplier")
}

pub(super) fn joined_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn build_service() -> (
    ProgressService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ProgressService::new(Arc::new(engine()), repository.clone(), notifier.clone());
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<UserId, ProgressRecord>>>,
}

impl ProgressRepository for MemoryRepository {
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
        let stored = guard
            .get_mut(&record.user_id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::VersionConflict {
                expected: expected_version,
                found: stored.version,
            });
        }
        *stored = record;
        Ok(())
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

/// Loses the first `conflicts` writes to a simulated concurrent writer.
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRepository,
    pub(super) conflicts: AtomicUsize,
}

impl RacingRepository {
    pub(super) fn new(conflicts: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            conflicts: AtomicUsize::new(conflicts),
        }
    }
}

impl ProgressRepository for RacingRepository {
    fn insert(&self, record: ProgressRecord) -> Result<ProgressRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: ProgressRecord, expected_version: u64) -> Result<(), RepositoryError> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(RepositoryError::VersionConflict {
                expected: expected_version,
                found: expected_version + 1,
            });
        }
        self.inner.update(record, expected_version)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<ProgressRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<ProgressRecord>, RepositoryError> {
        self.inner.list()
    }
}

pub(super) struct UnavailableRepository;

impl ProgressRepository for UnavailableRepository {
    fn insert(&self, _record: ProgressRecord) -> Result<ProgressRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ProgressRecord, _expected: u64) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &UserId) -> Result<Option<ProgressRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ProgressRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<RankUpNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<RankUpNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl RankUpNotifier for MemoryNotifier {
    fn notify(&self, notice: RankUpNotice) -> Result<(), NotificationError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl RankUpNotifier for OfflineNotifier {
    fn notify(&self, _notice: RankUpNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("push gateway down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
