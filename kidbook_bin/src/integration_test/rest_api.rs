use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use rest::PARENT_ID_HEADER;
use serde_json::json;
use tokio::task::JoinSet;
use tower::ServiceExt;

use crate::integration_test::*;

fn post_booking(parent_id: i64, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/bookings")
        .header("content-type", "application/json")
        .header(PARENT_ID_HEADER, parent_id.to_string())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn single_booking_body(child_id: i64, schedule_id: i64, session_date: &str) -> serde_json::Value {
    json!({
        "child_id": child_id,
        "service_id": FOOTBALL,
        "booking_type": "single",
        "session_dates": [{"schedule_id": schedule_id, "session_date": session_date}],
    })
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_and_fetch_booking() {
    let test_setup = TestSetup::new().await;
    let router = rest::build_router(test_setup.rest_state.clone());
    let session_date = days_from_today(7);

    let body = json!({
        "child_id": CHILD,
        "service_id": FOOTBALL,
        "booking_type": "trial",
        "session_dates": [{"schedule_id": FOOTBALL_MONDAY, "session_date": session_date}],
        "parent_notes": "First time on a pitch",
    });
    let response = router
        .clone()
        .oneshot(post_booking(PARENT.parent_id, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["data"]["total_amount"], "10.00");
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["booking_type"], "trial");
    assert_eq!(created["data"]["sessions"][0]["session_date"], session_date);
    assert_eq!(created["data"]["sessions"][0]["start_time"], "09:30:00");
    assert_eq!(created["data"]["sessions"][0]["coach_name"], "Sam Taylor");
    let booking_id = created["data"]["booking_id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/bookings/{booking_id}"))
                .header(PARENT_ID_HEADER, PARENT.parent_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = json_body(response).await;
    assert_eq!(detail["data"]["booking_number"], created["data"]["booking_number"]);
    assert_eq!(detail["data"]["vendor_name"], "Little Kickers");
    assert_eq!(detail["data"]["parent_notes"], "First time on a pitch");
    assert_eq!(detail["data"]["$version"], 1);
    assert_eq!(detail["data"]["next_session"]["session_number"], 1);

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/bookings/{booking_id}"))
                .header(PARENT_ID_HEADER, OTHER_PARENT.parent_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validation_errors_over_http() {
    let test_setup = TestSetup::new().await;
    let router = rest::build_router(test_setup.rest_state.clone());

    let response = router
        .clone()
        .oneshot(post_booking(
            PARENT.parent_id,
            &single_booking_body(CHILD, FOOTBALL_MONDAY, &days_from_today(-2)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "PAST_DATE_BOOKING");

    let response = router
        .oneshot(post_booking(
            OTHER_PARENT.parent_id,
            &single_booking_body(CHILD, FOOTBALL_MONDAY, &days_from_today(7)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "CHILD_NOT_FOUND");

    assert_eq!(test_setup.count_rows("bookings").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_last_slot_over_http() {
    let test_setup = TestSetup::new().await;
    let router = rest::build_router(test_setup.rest_state.clone());
    let session_date = days_from_today(10);

    let mut join_set = JoinSet::new();
    for (principal, child_id) in [(PARENT, CHILD), (OTHER_PARENT, OTHER_CHILD)] {
        let request = post_booking(
            principal.parent_id,
            &single_booking_body(child_id, FOOTBALL_WEDNESDAY, &session_date),
        );
        join_set.spawn(router.clone().oneshot(request));
    }

    let mut statuses = Vec::new();
    while let Some(response) = join_set.join_next().await {
        statuses.push(response.unwrap().unwrap().status());
    }
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(
        test_setup.occupied(FOOTBALL_WEDNESDAY, &session_date).await,
        1
    );
}
