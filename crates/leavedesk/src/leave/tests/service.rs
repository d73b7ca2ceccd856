use super::common::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::leave::domain::{LeaveId, LeaveStatus, LeaveType, ValidationError, DEFAULT_APPLICANT};
use crate::leave::lifecycle::{TransitionError, TransitionPolicy};
use crate::leave::service::{LeaveService, LeaveServiceError, LeaveServiceSettings};
use crate::leave::session::Session;
use crate::leave::store::MemoryBlobStore;
use crate::leave::views::LeaveView;
use crate::leave::LEAVE_STORAGE_KEY;

#[tokio::test]
async fn submitted_ids_are_pairwise_distinct() {
    let (service, _) = build_service();

    let mut ids = HashSet::new();
    for _ in 0..25 {
        let record = service
            .submit(submission("2024-03-01", "2024-03-02"), "alice")
            .await
            .expect("submission accepted");
        ids.insert(record.id);
    }

    assert_eq!(ids.len(), 25);
    assert_eq!(service.list_all().await.len(), 25);
}

#[tokio::test]
async fn submit_returns_pending_record_without_processed_date() {
    let (service, _) = build_service();

    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");

    assert_eq!(record.status, LeaveStatus::Pending);
    assert!(record.processed_date.is_none());
    assert_eq!(record.applicant, "alice");
    assert_eq!(record.leave_type, LeaveType::Casual);
    assert_eq!(record.day_span(), 3);
}

#[tokio::test]
async fn blank_applicant_is_recorded_as_placeholder() {
    let (service, _) = build_service();

    let record = service
        .submit(submission("2024-01-10", "2024-01-10"), "  ")
        .await
        .expect("submission accepted");

    assert_eq!(record.applicant, DEFAULT_APPLICANT);
}

#[tokio::test]
async fn invalid_submissions_never_reach_the_store() {
    let (service, blobs) = build_service();

    let mut blank = submission("2024-01-10", "2024-01-12");
    blank.reason = "   ".to_string();
    match service.submit(blank, "alice").await {
        Err(LeaveServiceError::Validation(ValidationError::EmptyReason)) => {}
        other => panic!("expected empty reason error, got {other:?}"),
    }

    match service
        .submit(submission("2024-01-12", "2024-01-10"), "alice")
        .await
    {
        Err(LeaveServiceError::Validation(ValidationError::InvalidDateRange { .. })) => {}
        other => panic!("expected date range error, got {other:?}"),
    }

    assert!(persisted(&blobs).is_none());
}

#[tokio::test]
async fn approval_stamps_processed_date_after_applied_date() {
    let (service, _) = build_service();
    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");

    let updated = service
        .update_status(&record.id, LeaveStatus::Approved)
        .await
        .expect("pending leave can be approved");

    assert_eq!(updated.status, LeaveStatus::Approved);
    let processed = updated.processed_date.expect("processed date stamped");
    assert!(processed >= updated.applied_date);

    let stored = service.get(&record.id).await.expect("record present");
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn unknown_id_is_not_found_and_leaves_store_untouched() {
    let (service, blobs) = build_service();
    service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");
    let before = persisted(&blobs);

    match service
        .update_status(&LeaveId::from("nonexistent-id"), LeaveStatus::Approved)
        .await
    {
        Err(LeaveServiceError::NotFound(id)) => assert_eq!(id.as_str(), "nonexistent-id"),
        other => panic!("expected not found error, got {other:?}"),
    }

    assert_eq!(persisted(&blobs), before);
}

#[tokio::test]
async fn strict_policy_refuses_to_reopen_decided_leave() {
    let (service, blobs) = build_service();
    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");
    service
        .update_status(&record.id, LeaveStatus::Rejected)
        .await
        .expect("reject");
    let before = persisted(&blobs);

    match service.update_status(&record.id, LeaveStatus::Approved).await {
        Err(LeaveServiceError::Transition(TransitionError::InvalidTransition { from, to })) => {
            assert_eq!(from, LeaveStatus::Rejected);
            assert_eq!(to, LeaveStatus::Approved);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
    assert_eq!(persisted(&blobs), before);
}

#[tokio::test]
async fn repeated_decision_refreshes_processed_date() {
    let (service, _) = build_service();
    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");

    let first = service
        .update_status(&record.id, LeaveStatus::Approved)
        .await
        .expect("approve");
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = service
        .update_status(&record.id, LeaveStatus::Approved)
        .await
        .expect("approve again");

    assert_eq!(second.status, LeaveStatus::Approved);
    assert!(second.processed_date > first.processed_date);
}

#[tokio::test]
async fn permissive_policy_lets_reviewers_reopen() {
    let blobs = Arc::new(MemoryBlobStore::default());
    let service = LeaveService::new(
        blobs,
        LeaveServiceSettings {
            policy: TransitionPolicy::Permissive,
            ..unseeded_settings()
        },
    );
    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");

    service
        .update_status(&record.id, LeaveStatus::Approved)
        .await
        .expect("approve");
    let reopened = service
        .update_status(&record.id, LeaveStatus::Pending)
        .await
        .expect("reopen allowed");

    assert_eq!(reopened.status, LeaveStatus::Pending);
    assert!(reopened.processed_date.is_some());
}

#[tokio::test]
async fn list_by_applicant_keeps_only_their_records_in_order() {
    let (service, _) = build_service();
    let mut alice_ids = Vec::new();
    for (applicant, start) in [
        ("alice", "2024-01-01"),
        ("bob", "2024-01-02"),
        ("alice", "2024-01-03"),
        ("carol", "2024-01-04"),
        ("alice", "2024-01-05"),
    ] {
        let record = service
            .submit(submission(start, start), applicant)
            .await
            .expect("submission accepted");
        if applicant == "alice" {
            alice_ids.push(record.id);
        }
    }

    let mine: Vec<_> = service
        .list_by_applicant("alice")
        .await
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(mine, alice_ids);

    let everyone: Vec<_> = service
        .list_all()
        .await
        .into_iter()
        .map(|record| record.applicant)
        .collect();
    assert_eq!(everyone, vec!["alice", "bob", "alice", "carol", "alice"]);
}

#[tokio::test]
async fn empty_store_is_seeded_once() {
    let (service, blobs) = seeded_service();

    let first = service.list_all().await;
    assert_eq!(first.len(), 3);
    let shape: Vec<_> = first
        .iter()
        .map(|record| (record.leave_type, record.status))
        .collect();
    assert_eq!(
        shape,
        vec![
            (LeaveType::Casual, LeaveStatus::Approved),
            (LeaveType::Sick, LeaveStatus::Approved),
            (LeaveType::Emergency, LeaveStatus::Pending),
        ]
    );
    assert!(persisted(&blobs).is_some());

    let second = service.list_all().await;
    assert_eq!(second, first);
}

#[tokio::test]
async fn history_and_review_share_one_seed() {
    let (service, _) = seeded_service();

    let history = service.list_by_applicant("john_doe").await;
    assert_eq!(history.len(), 2);

    let all = service.list_all().await;
    assert_eq!(all.len(), 3);
    assert!(history.iter().all(|record| all.contains(record)));
}

#[tokio::test]
async fn submitting_first_skips_the_demo_seed() {
    let (service, _) = seeded_service();
    service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");

    assert_eq!(service.list_all().await.len(), 1);
}

#[tokio::test]
async fn corrupted_store_is_treated_as_empty() {
    let blobs = Arc::new(MemoryBlobStore::with_blob(LEAVE_STORAGE_KEY, "[{\"id\":"));
    let service = LeaveService::new(blobs.clone(), unseeded_settings());
    assert!(service.list_all().await.is_empty());

    let reseeding = LeaveService::new(blobs, LeaveServiceSettings::default());
    assert_eq!(reseeding.list_all().await.len(), 3);
}

#[tokio::test]
async fn failed_writes_are_swallowed() {
    let service = LeaveService::new(Arc::new(ReadOnlyBlobStore), LeaveServiceSettings::default());

    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("write failures do not surface");
    assert_eq!(record.status, LeaveStatus::Pending);

    let listed = service.list_all().await;
    assert_eq!(listed.len(), 3, "seed is served even when it cannot be kept");
    assert!(listed.iter().all(|r| r.id != record.id));
}

#[tokio::test]
async fn unreadable_store_lists_nothing_and_cannot_find_records() {
    let service = LeaveService::new(Arc::new(OfflineBlobStore), unseeded_settings());

    assert!(service.list_all().await.is_empty());
    assert!(matches!(
        service
            .update_status(&LeaveId::from("lv-1"), LeaveStatus::Approved)
            .await,
        Err(LeaveServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn concurrent_reviews_do_not_lose_updates() {
    let (service, _) = build_service();
    let first = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submit");
    let second = service
        .submit(submission("2024-02-10", "2024-02-12"), "bob")
        .await
        .expect("submit");

    let (approved, rejected) = tokio::join!(
        service.update_status(&first.id, LeaveStatus::Approved),
        service.update_status(&second.id, LeaveStatus::Rejected),
    );
    approved.expect("approve");
    rejected.expect("reject");

    let statuses: Vec<_> = service
        .list_all()
        .await
        .into_iter()
        .map(|record| record.status)
        .collect();
    assert_eq!(statuses, vec![LeaveStatus::Approved, LeaveStatus::Rejected]);
}

#[tokio::test]
async fn abandoned_submission_still_lands() {
    let blobs = Arc::new(MemoryBlobStore::default());
    let service = LeaveService::new(
        blobs,
        LeaveServiceSettings {
            latency: Duration::from_millis(30),
            ..unseeded_settings()
        },
    );

    let abandoned = tokio::time::timeout(
        Duration::from_millis(1),
        service.submit(submission("2024-01-10", "2024-01-12"), "alice"),
    )
    .await;
    assert!(abandoned.is_err(), "caller gave up before the write");

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(service.list_by_applicant("alice").await.len(), 1);
}

#[tokio::test]
async fn balance_is_recomputed_from_persisted_records() {
    let (service, blobs) = build_service();
    assert_eq!(service.balance("alice").await.remaining, 18);

    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submit");
    assert_eq!(service.balance("alice").await.remaining, 15);

    let reloaded = LeaveService::new(blobs, unseeded_settings());
    assert_eq!(reloaded.balance("alice").await.remaining, 15);

    reloaded
        .update_status(&record.id, LeaveStatus::Rejected)
        .await
        .expect("reject");
    assert_eq!(reloaded.balance("alice").await.remaining, 18);
}

#[tokio::test]
async fn view_follows_session_role() {
    let (service, _) = seeded_service();

    let employee = Session::sign_in("john_doe", "pw").expect("sign in");
    match service.view_for(&employee).await {
        LeaveView::Employee(view) => {
            assert_eq!(view.records.len(), 2);
            // 2 approved days + 1 pending day
            assert_eq!(view.balance.remaining, 15);
        }
        other => panic!("expected employee view, got {other:?}"),
    }

    let reviewer = Session::sign_in("site_admin", "pw").expect("sign in");
    match service.view_for(&reviewer).await {
        LeaveView::Admin(view) => {
            assert_eq!(view.records.len(), 3);
            assert_eq!(view.counts.pending, 1);
            assert_eq!(view.counts.approved, 2);
            assert_eq!(view.partition.rejected.len(), 0);
        }
        other => panic!("expected reviewer view, got {other:?}"),
    }
}

#[tokio::test]
async fn padded_username_sees_its_own_records() {
    let (service, _) = build_service();
    let session = Session::sign_in(" alice ", "pw").expect("sign in");

    service
        .submit(submission("2024-01-10", "2024-01-12"), &session.username)
        .await
        .expect("submission accepted");

    assert_eq!(service.list_all().await[0].applicant, " alice ");
    match service.view_for(&session).await {
        LeaveView::Employee(view) => {
            assert_eq!(view.records.len(), 1);
            assert_eq!(view.balance.remaining, 15);
        }
        other => panic!("expected employee view, got {other:?}"),
    }
}

#[tokio::test]
async fn pending_to_pending_leaves_store_untouched() {
    let (service, blobs) = build_service();
    let record = service
        .submit(submission("2024-01-10", "2024-01-12"), "alice")
        .await
        .expect("submission accepted");
    let before = persisted(&blobs);

    let unchanged = service
        .update_status(&record.id, LeaveStatus::Pending)
        .await
        .expect("no-op accepted");

    assert_eq!(unchanged, record);
    assert!(unchanged.processed_date.is_none());
    assert_eq!(persisted(&blobs), before);
}
