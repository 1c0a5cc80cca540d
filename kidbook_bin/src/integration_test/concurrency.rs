use rest::RestStateDef;
use service::{booking::BookingService, ServiceError};
use tokio::task::JoinSet;

use crate::integration_test::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_respect_capacity() {
    let test_setup = TestSetup::new().await;
    let session_date = days_from_today(14);

    let mut join_set = JoinSet::new();
    for _ in 0..6 {
        let booking_service = test_setup.rest_state.booking_service();
        let session_date = session_date.clone();
        join_set.spawn(async move {
            booking_service
                .create_booking(
                    PARENT,
                    &booking_request(CHILD, "single", &[(FOOTBALL_MONDAY, &session_date)]),
                )
                .await
        });
    }

    let mut successes = 0;
    while let Some(result) = join_set.join_next().await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(ServiceError::SlotConflict { .. }) | Err(ServiceError::BookingConflict) => {}
            Err(err) => panic!("unexpected error: {err:?}"),
        }
    }

    assert_eq!(successes, 2);
    assert_eq!(
        test_setup.occupied(FOOTBALL_MONDAY, &session_date).await,
        successes
    );
    assert_eq!(test_setup.count_rows("bookings").await, successes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_with_free_seats_all_succeed() {
    let test_setup = TestSetup::new().await;
    sqlx::query("UPDATE schedules SET available_slots = 6 WHERE id = ?")
        .bind(FOOTBALL_MONDAY)
        .execute(test_setup.pool.as_ref())
        .await
        .unwrap();
    let session_date = days_from_today(14);

    let mut join_set = JoinSet::new();
    for _ in 0..6 {
        let booking_service = test_setup.rest_state.booking_service();
        let session_date = session_date.clone();
        join_set.spawn(async move {
            booking_service
                .create_booking(
                    PARENT,
                    &booking_request(CHILD, "single", &[(FOOTBALL_MONDAY, &session_date)]),
                )
                .await
        });
    }

    while let Some(result) = join_set.join_next().await {
        if let Err(err) = result.unwrap() {
            panic!("booking with a free seat failed: {err:?}");
        }
    }
    assert_eq!(
        test_setup.occupied(FOOTBALL_MONDAY, &session_date).await,
        6
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_last_slot_goes_to_exactly_one_parent() {
    let test_setup = TestSetup::new().await;
    let session_date = days_from_today(10);

    let mut join_set = JoinSet::new();
    for (principal, child_id) in [(PARENT, CHILD), (OTHER_PARENT, OTHER_CHILD)] {
        let booking_service = test_setup.rest_state.booking_service();
        let session_date = session_date.clone();
        join_set.spawn(async move {
            booking_service
                .create_booking(
                    principal,
                    &booking_request(child_id, "single", &[(FOOTBALL_WEDNESDAY, &session_date)]),
                )
                .await
        });
    }

    let mut successes = 0;
    let mut conflicts = 0;
    while let Some(result) = join_set.join_next().await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(ServiceError::SlotConflict { .. }) | Err(ServiceError::BookingConflict) => {
                conflicts += 1
            }
            Err(err) => panic!("unexpected error: {err:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(
        test_setup.occupied(FOOTBALL_WEDNESDAY, &session_date).await,
        1
    );
    assert_eq!(test_setup.count_rows("booking_sessions").await, 1);
}
