use kidbook_utils::Money;
use rest::RestStateDef;
use service::{
    booking::{BookingService, BookingStatus, BookingType, SessionStatus},
    ServiceError,
};
use time::macros::time;

use crate::integration_test::*;

#[tokio::test]
async fn test_trial_and_package_pricing() {
    let test_setup = TestSetup::new().await;
    let booking_service = test_setup.rest_state.booking_service();

    let trial = booking_service
        .create_booking(
            PARENT,
            &booking_request(CHILD, "trial", &[(FOOTBALL_MONDAY, &days_from_today(7))]),
        )
        .await
        .unwrap();
    assert_eq!(trial.booking_type, BookingType::Trial);
    assert_eq!(trial.total_sessions, 1);
    assert_eq!(trial.total_amount, Money::from_cents(1000));
    assert_eq!(trial.total_amount.to_string(), "10.00");

    let dates: Vec<String> = (1..=4).map(|week| days_from_today(7 * week + 1)).collect();
    let sessions: Vec<(i64, &str)> = dates
        .iter()
        .map(|session_date| (FOOTBALL_MONDAY, session_date.as_str()))
        .collect();
    let package = booking_service
        .create_booking(PARENT, &booking_request(CHILD, "package_4", &sessions))
        .await
        .unwrap();
    assert_eq!(package.total_sessions, 4);
    assert_eq!(package.total_amount.to_string(), "60.00");
    assert_eq!(package.status, BookingStatus::Pending);
    assert_eq!(package.service_name.as_ref(), "Junior Football");
    assert_eq!(package.child_name.as_ref(), "Mia");
    assert_eq!(package.sessions.len(), 4);
    for session in package.sessions.iter() {
        assert_eq!(session.start_time, time!(9:30));
        assert_eq!(session.end_time, time!(10:30));
        assert_eq!(session.coach_name.as_deref(), Some("Sam Taylor"));
    }
    assert_ne!(trial.booking_number, package.booking_number);
    assert!(package.booking_number.starts_with("BK-"));

    assert_eq!(test_setup.count_rows("bookings").await, 2);
    assert_eq!(test_setup.count_rows("booking_sessions").await, 5);
}

#[tokio::test]
async fn test_session_without_coach() {
    let test_setup = TestSetup::new().await;

    let confirmation = test_setup
        .rest_state
        .booking_service()
        .create_booking(
            PARENT,
            &booking_request(CHILD, "single", &[(FOOTBALL_WEDNESDAY, &days_from_today(3))]),
        )
        .await
        .unwrap();

    assert_eq!(confirmation.total_amount.to_string(), "15.00");
    assert_eq!(confirmation.sessions[0].coach_name, None);
    assert_eq!(confirmation.sessions[0].start_time, time!(16:00));
}

#[tokio::test]
async fn test_past_date_is_rejected() {
    let test_setup = TestSetup::new().await;

    let result = test_setup
        .rest_state
        .booking_service()
        .create_booking(
            PARENT,
            &booking_request(CHILD, "single", &[(FOOTBALL_MONDAY, &days_from_today(-1))]),
        )
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::PastDateBooking { index: 1, .. })
    ));
    assert_eq!(test_setup.count_rows("bookings").await, 0);
    assert_eq!(test_setup.count_rows("booking_sessions").await, 0);
}

#[tokio::test]
async fn test_today_is_already_past() {
    let test_setup = TestSetup::new().await;

    let result = test_setup
        .rest_state
        .booking_service()
        .create_booking(
            PARENT,
            &booking_request(CHILD, "single", &[(FOOTBALL_MONDAY, &days_from_today(0))]),
        )
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::PastDateBooking { index: 1, .. })
    ));
    assert_eq!(test_setup.count_rows("bookings").await, 0);
}

#[tokio::test]
async fn test_child_of_other_parent() {
    let test_setup = TestSetup::new().await;

    let result = test_setup
        .rest_state
        .booking_service()
        .create_booking(
            OTHER_PARENT,
            &booking_request(CHILD, "single", &[(FOOTBALL_MONDAY, &days_from_today(7))]),
        )
        .await;

    assert!(matches!(result, Err(ServiceError::ChildNotOwned(CHILD))));
    assert_eq!(test_setup.count_rows("bookings").await, 0);
}

#[tokio::test]
async fn test_draft_service_is_unavailable() {
    let test_setup = TestSetup::new().await;
    let mut request = booking_request(CHILD, "single", &[(SWIMMING_MONDAY, &days_from_today(7))]);
    request.service_id = SWIMMING;

    let result = test_setup
        .rest_state
        .booking_service()
        .create_booking(PARENT, &request)
        .await;

    assert!(matches!(result, Err(ServiceError::ServiceUnavailable(SWIMMING))));
}

#[tokio::test]
async fn test_schedule_of_other_service() {
    let test_setup = TestSetup::new().await;

    let result = test_setup
        .rest_state
        .booking_service()
        .create_booking(
            PARENT,
            &booking_request(CHILD, "single", &[(SWIMMING_MONDAY, &days_from_today(7))]),
        )
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::ScheduleNotFound(SWIMMING_MONDAY))
    ));
    assert_eq!(test_setup.count_rows("booking_sessions").await, 0);
}

#[tokio::test]
async fn test_failure_leaves_no_rows() {
    let test_setup = TestSetup::new().await;
    let booking_service = test_setup.rest_state.booking_service();
    let dates: Vec<String> = (1..=4).map(|week| days_from_today(7 * week)).collect();

    // Third session on an inactive schedule.
    let result = booking_service
        .create_booking(
            PARENT,
            &booking_request(
                CHILD,
                "package_4",
                &[
                    (FOOTBALL_MONDAY, &dates[0]),
                    (FOOTBALL_MONDAY, &dates[1]),
                    (FOOTBALL_FRIDAY, &dates[2]),
                    (FOOTBALL_MONDAY, &dates[3]),
                ],
            ),
        )
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::ScheduleNotFound(FOOTBALL_FRIDAY))
    ));
    assert_eq!(test_setup.count_rows("bookings").await, 0);
    assert_eq!(test_setup.count_rows("booking_sessions").await, 0);

    // Second session on a slot which is already taken.
    booking_service
        .create_booking(
            OTHER_PARENT,
            &booking_request(OTHER_CHILD, "single", &[(FOOTBALL_WEDNESDAY, &dates[1])]),
        )
        .await
        .unwrap();
    let result = booking_service
        .create_booking(
            PARENT,
            &booking_request(
                CHILD,
                "package_4",
                &[
                    (FOOTBALL_MONDAY, &dates[0]),
                    (FOOTBALL_WEDNESDAY, &dates[1]),
                    (FOOTBALL_MONDAY, &dates[2]),
                    (FOOTBALL_MONDAY, &dates[3]),
                ],
            ),
        )
        .await;
    assert!(matches!(result, Err(ServiceError::BookingConflict)));
    assert_eq!(test_setup.count_rows("bookings").await, 1);
    assert_eq!(test_setup.count_rows("booking_sessions").await, 1);
    assert_eq!(test_setup.occupied(FOOTBALL_MONDAY, &dates[0]).await, 0);
}

#[tokio::test]
async fn test_cancelled_session_frees_its_seat() {
    let test_setup = TestSetup::new().await;
    let booking_service = test_setup.rest_state.booking_service();
    let session_date = days_from_today(9);

    booking_service
        .create_booking(
            PARENT,
            &booking_request(CHILD, "single", &[(FOOTBALL_WEDNESDAY, &session_date)]),
        )
        .await
        .unwrap();
    sqlx::query("UPDATE booking_sessions SET status = 'cancelled'")
        .execute(test_setup.pool.as_ref())
        .await
        .unwrap();

    let result = booking_service
        .create_booking(
            OTHER_PARENT,
            &booking_request(OTHER_CHILD, "single", &[(FOOTBALL_WEDNESDAY, &session_date)]),
        )
        .await;
    assert!(result.is_ok());
    assert_eq!(test_setup.occupied(FOOTBALL_WEDNESDAY, &session_date).await, 1);
}

#[tokio::test]
async fn test_get_booking() {
    let test_setup = TestSetup::new().await;
    let booking_service = test_setup.rest_state.booking_service();
    let dates: Vec<String> = (1..=4).map(|week| days_from_today(7 * week)).collect();
    let sessions: Vec<(i64, &str)> = dates
        .iter()
        .rev()
        .map(|session_date| (FOOTBALL_MONDAY, session_date.as_str()))
        .collect();
    let confirmation = booking_service
        .create_booking(PARENT, &booking_request(CHILD, "package_4", &sessions))
        .await
        .unwrap();

    let detail = booking_service
        .get_booking(PARENT, confirmation.booking_id, None)
        .await
        .unwrap();
    assert_eq!(detail.booking.booking_number, confirmation.booking_number);
    assert_eq!(detail.booking.parent_id, PARENT.parent_id);
    assert_eq!(detail.booking.version, 1);
    assert_eq!(detail.service_name.as_ref(), "Junior Football");
    assert_eq!(detail.child_name.as_ref(), "Mia");
    assert_eq!(detail.vendor_name.as_ref(), "Little Kickers");
    assert_eq!(detail.completed_sessions, 0);
    assert!(detail
        .sessions
        .iter()
        .all(|session| session.status == SessionStatus::Scheduled));
    // Sessions come back in date order, not request order.
    let session_dates: Vec<String> = detail
        .sessions
        .iter()
        .map(|session| kidbook_utils::format_iso_date(session.session_date).unwrap())
        .collect();
    assert_eq!(session_dates, dates);
    let next_session = detail.next_session.unwrap();
    assert_eq!(next_session.session_number, 1);
    assert_eq!(
        kidbook_utils::format_iso_date(next_session.session_date).unwrap(),
        dates[0]
    );

    let result = booking_service
        .get_booking(OTHER_PARENT, confirmation.booking_id, None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let result = booking_service.get_booking(PARENT, 4711, None).await;
    assert!(matches!(result, Err(ServiceError::EntityNotFound(4711))));
}
