//! Tests for the registration service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{InMemoryRegistrationStore, MockRegistrationStore};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn submission() -> RegistrationSubmission {
    RegistrationSubmission::try_from_parts("Ada", "Lovelace", "ada@example.org", "+44 1234 5678")
        .expect("valid submission")
}

fn stored(token: &str) -> Registration {
    Registration::new(
        RegistrationToken::from_stored(token),
        submission(),
        fixture_timestamp(),
    )
}

#[fixture]
fn service() -> RegistrationService<InMemoryRegistrationStore> {
    RegistrationService::new(Arc::new(InMemoryRegistrationStore::new()), fixture_clock())
}

fn mock_service(store: MockRegistrationStore) -> RegistrationService<MockRegistrationStore> {
    RegistrationService::new(Arc::new(store), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn register_stamps_clock_time_and_persists(
    service: RegistrationService<InMemoryRegistrationStore>,
) {
    let registration = service.register(submission()).await.expect("register");

    assert_eq!(registration.created_at(), fixture_timestamp());
    assert_eq!(registration.first_name(), "Ada");

    let found = service
        .find_for_visitor(registration.token().as_ref())
        .await
        .expect("lookup");
    assert_eq!(found, Some(registration));
}

#[rstest]
#[tokio::test]
async fn wall_clock_stamp_is_never_before_the_call() {
    let service = RegistrationService::new(
        Arc::new(InMemoryRegistrationStore::new()),
        Arc::new(DefaultClock),
    );

    for _ in 0..200 {
        let start = Utc::now();
        let registration = service.register(submission()).await.expect("register");
        assert!(
            registration.created_at() >= start,
            "created_at {} precedes call start {start}",
            registration.created_at()
        );
    }
}

#[rstest]
#[tokio::test]
async fn each_registration_gets_a_distinct_token(
    service: RegistrationService<InMemoryRegistrationStore>,
) {
    let first = service.register(submission()).await.expect("first");
    let second = service.register(submission()).await.expect("second");

    assert_ne!(first.token(), second.token());
    let stats = service.statistics().await.expect("statistics");
    assert_eq!(stats.total, 2);
}

#[rstest]
#[tokio::test]
async fn unknown_visitor_token_is_not_an_error(
    service: RegistrationService<InMemoryRegistrationStore>,
) {
    let found = service
        .find_for_visitor("not-a-real-token")
        .await
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn delete_miss_reports_not_found(service: RegistrationService<InMemoryRegistrationStore>) {
    let err = service.delete("missing").await.expect_err("nothing to delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(!err.message().contains("missing"));
}

#[rstest]
#[tokio::test]
async fn delete_removes_registration_from_every_view(
    service: RegistrationService<InMemoryRegistrationStore>,
) {
    let kept = service.register(submission()).await.expect("kept");
    let gone = service.register(submission()).await.expect("gone");

    service
        .delete(gone.token().as_ref())
        .await
        .expect("delete existing");

    assert!(
        service
            .find_for_visitor(gone.token().as_ref())
            .await
            .expect("lookup")
            .is_none()
    );
    let exported = service.export().await.expect("export");
    assert_eq!(exported, vec![kept]);
    assert_eq!(service.statistics().await.expect("stats").total, 1);
}

#[rstest]
#[tokio::test]
async fn statistics_caps_recent_list() {
    let store = Arc::new(InMemoryRegistrationStore::new());
    let service = RegistrationService::new(Arc::clone(&store), fixture_clock());
    for _ in 0..(RECENT_REGISTRATIONS_LIMIT + 2) {
        service.register(submission()).await.expect("register");
    }

    let stats = service.statistics().await.expect("stats");
    assert_eq!(stats.total, 12);
    assert_eq!(stats.recent.len(), RECENT_REGISTRATIONS_LIMIT);
}

#[tokio::test]
async fn token_collision_surfaces_as_internal_error() {
    let mut store = MockRegistrationStore::new();
    store
        .expect_insert()
        .times(1)
        .return_once(|_| Err(RegistrationStoreError::conflict()));

    let err = mock_service(store)
        .register(submission())
        .await
        .expect_err("collision must fail");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn unavailable_store_maps_to_service_unavailable_without_detail() {
    let mut store = MockRegistrationStore::new();
    store
        .expect_find_by_token()
        .times(1)
        .return_once(|_| Err(RegistrationStoreError::unavailable("disk I/O error at /var/db")));

    let err = mock_service(store)
        .find_for_visitor("tok")
        .await
        .expect_err("outage must fail");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(!err.message().contains("/var/db"));
}

#[tokio::test]
async fn statistics_queries_count_then_recent_with_limit() {
    let mut store = MockRegistrationStore::new();
    store.expect_count().times(1).return_once(|| Ok(1));
    store
        .expect_list_recent()
        .withf(|limit| *limit == RECENT_REGISTRATIONS_LIMIT)
        .times(1)
        .return_once(|_| Ok(vec![stored("tok")]));

    let stats = mock_service(store).statistics().await.expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.recent, vec![stored("tok")]);
}

#[tokio::test]
async fn export_failure_is_propagated() {
    let mut store = MockRegistrationStore::new();
    store
        .expect_list_all()
        .times(1)
        .return_once(|| Err(RegistrationStoreError::unavailable("closed")));

    let err = mock_service(store).export().await.expect_err("export fails");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
