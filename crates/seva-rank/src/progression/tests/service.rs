use super::common::*;
use crate::progression::repository::ProgressRepository;
use crate::progression::{
    ProgressService, ProgressServiceError, ProgressionError, RepositoryError,
};
use std::sync::Arc;

#[test]
fn enroll_stores_initial_state() {
    let (service, repository, _) = build_service();

    let record = service
        .enroll(user("priya"), joined_at())
        .expect("enrollment succeeds");

    assert_eq!(record.version, 0);
    assert_eq!(record.state.current_tier(), "Sevak");
    let stored = repository
        .fetch(&user("priya"))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, record);
}

#[test]
fn enroll_rejects_duplicates() {
    let (service, _, _) = build_service();
    service.enroll(user("priya"), joined_at()).expect("first");

    match service.enroll(user("priya"), later()) {
        Err(ProgressServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn record_impact_persists_and_notifies_on_rank_up() {
    let (service, repository, notifier) = build_service();
    service.enroll(user("arjun"), joined_at()).expect("enroll");

    let quiet = service
        .record_impact(&user("arjun"), 1, later())
        .expect("first activity");
    assert!(quiet.transition.is_none());
    assert!(notifier.notices().is_empty());

    let receipt = service
        .record_impact(&user("arjun"), 25, later())
        .expect("second activity");

    assert_eq!(receipt.earned, 125);
    assert_eq!(receipt.state.points(), 130);
    assert!(receipt.notified);
    let transition = receipt.transition.expect("rank up");
    assert_eq!(transition.to, "Talveer");
    assert_eq!(transition.skipped, vec!["Mavla".to_string()]);

    let stored = repository
        .fetch(&user("arjun"))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.version, 2);
    assert_eq!(stored.state.points(), 130);

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].user_id, user("arjun"));
    assert_eq!(notices[0].points, 130);
    assert_eq!(notices[0].transition.from, "Sevak");
}

#[test]
fn record_impact_rejects_negative_units_before_writing() {
    let (service, repository, notifier) = build_service();
    service.enroll(user("arjun"), joined_at()).expect("enroll");

    match service.record_impact(&user("arjun"), -4, later()) {
        Err(ProgressServiceError::Progression(ProgressionError::InvalidInput { units: -4 })) => {}
        other => panic!("expected invalid input, got {other:?}"),
    }

    let stored = repository
        .fetch(&user("arjun"))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.version, 0);
    assert_eq!(stored.state.points(), 0);
    assert!(notifier.notices().is_empty());
}

#[test]
fn record_impact_for_unknown_member_is_not_found() {
    let (service, _, _) = build_service();

    match service.record_impact(&user("ghost"), 1, later()) {
        Err(ProgressServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn record_impact_retries_after_concurrent_write() {
    let repository = Arc::new(RacingRepository::new(2));
    let service = ProgressService::new(
        Arc::new(engine()),
        repository.clone(),
        Arc::new(MemoryNotifier::default()),
    );
    service.enroll(user("meera"), joined_at()).expect("enroll");

    let receipt = service
        .record_impact(&user("meera"), 2, later())
        .expect("third attempt succeeds");

    assert_eq!(receipt.state.current_tier(), "Mavla");
    let stored = repository
        .fetch(&user("meera"))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.version, 1);
}

#[test]
fn record_impact_gives_up_after_repeated_conflicts() {
    let repository = Arc::new(RacingRepository::new(5));
    let service = ProgressService::new(
        Arc::new(engine()),
        repository.clone(),
        Arc::new(MemoryNotifier::default()),
    );
    service.enroll(user("meera"), joined_at()).expect("enroll");

    match service.record_impact(&user("meera"), 2, later()) {
        Err(ProgressServiceError::Repository(RepositoryError::VersionConflict { .. })) => {}
        other => panic!("expected version conflict, got {other:?}"),
    }
    let stored = repository
        .fetch(&user("meera"))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.state.points(), 0);
}

#[test]
fn notifier_failure_keeps_the_recorded_points() {
    let repository = Arc::new(MemoryRepository::default());
    let service = ProgressService::new(
        Arc::new(engine()),
        repository.clone(),
        Arc::new(OfflineNotifier),
    );
    service.enroll(user("kavya"), joined_at()).expect("enroll");

    let receipt = service
        .record_impact(&user("kavya"), 2, later())
        .expect("activity recorded");

    assert!(receipt.transition.is_some());
    assert!(!receipt.notified);
    let stored = repository
        .fetch(&user("kavya"))
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.state.current_tier(), "Mavla");
}

#[test]
fn leaderboard_orders_by_points_then_user() {
    let (service, _, _) = build_service();
    for (id, units) in [("dev", 4), ("asha", 30), ("chetan", 4), ("bala", 0)] {
        service.enroll(user(id), joined_at()).expect("enroll");
        service
            .record_impact(&user(id), units, later())
            .expect("record");
    }

    let board = service.leaderboard(3).expect("leaderboard");

    assert_eq!(board.len(), 3);
    assert_eq!(board[0].user_id, user("asha"));
    assert_eq!(board[0].position, 1);
    assert_eq!(board[0].rank, "Talveer");
    assert_eq!(board[1].user_id, user("chetan"));
    assert_eq!(board[2].user_id, user("dev"));
    assert_eq!(board[2].points, 20);
    assert_eq!(board[2].position, 3);
}

#[test]
fn get_propagates_repository_failures() {
    let service = ProgressService::new(
        Arc::new(engine()),
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
    );

    match service.get(&user("anyone")) {
        Err(ProgressServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}
