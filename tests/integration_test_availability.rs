mod common;

use common::{body_json, TestApp};

// 2030-06-03 is a Monday; day_of_week 1 in the seeded weekly grid.
const MONDAY: &str = "2030-06-03";

#[tokio::test]
async fn weekly_schedule_generates_half_open_slot_grid() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.get(&format!("/api/v1/availability?date={}", MONDAY), &driver).await;
    assert_eq!(response.status(), 200);

    let body = body_json(response).await;
    assert_eq!(body["blocked"], false);

    // 08:00 to 17:00 every 30 minutes, end exclusive: 18 slots.
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 18);
    assert_eq!(slots[0]["time"], "08:00");
    assert_eq!(slots[17]["time"], "16:30");
    assert!(slots.iter().all(|s| s["capacity"] == 3 && s["available"] == 3));
    // No slot at the end boundary.
    assert!(slots.iter().all(|s| s["time"] != "17:00"));
}

#[tokio::test]
async fn day_without_schedule_has_no_slots() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    // 2030-06-09 is a Sunday; the seeded grid covers Monday-Friday only.
    let response = app.get("/api/v1/availability?date=2030-06-09", &driver).await;
    assert_eq!(response.status(), 200);

    let body = body_json(response).await;
    assert_eq!(body["blocked"], false);
    assert_eq!(body["slots"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn active_reservations_reduce_availability() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver, serde_json::json!({
        "reservation_date": MONDAY,
        "reservation_time": "10:00",
        "booking_number": "BK-1001",
        "transporter_name": "Transportes Andinos",
        "truck_plate": "ABC-123",
        "slots_requested": 1,
        "container_numbers": ["ABCD1234567"]
    })).await;
    assert_eq!(response.status(), 200);

    let response = app.get(&format!("/api/v1/availability?date={}", MONDAY), &driver).await;
    let body = body_json(response).await;
    let slots = body["slots"].as_array().unwrap();

    let ten = slots.iter().find(|s| s["time"] == "10:00").unwrap();
    assert_eq!(ten["capacity"], 3);
    assert_eq!(ten["available"], 2);

    let nine = slots.iter().find(|s| s["time"] == "09:00").unwrap();
    assert_eq!(nine["available"], 3);
}

#[tokio::test]
async fn exhausted_slot_disappears_from_availability() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(1).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver, serde_json::json!({
        "reservation_date": MONDAY,
        "reservation_time": "08:00",
        "booking_number": "BK-2001",
        "transporter_name": "Transportes Andinos",
        "truck_plate": "ABC-123",
        "slots_requested": 1,
        "container_numbers": ["ABCD1234567"]
    })).await;
    assert_eq!(response.status(), 200);

    let response = app.get(&format!("/api/v1/availability?date={}", MONDAY), &driver).await;
    let body = body_json(response).await;
    let slots = body["slots"].as_array().unwrap();

    assert_eq!(slots.len(), 17);
    assert!(slots.iter().all(|s| s["time"] != "08:00"));
}

#[tokio::test]
async fn cancelled_reservations_release_capacity() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(1).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver, serde_json::json!({
        "reservation_date": MONDAY,
        "reservation_time": "08:00",
        "booking_number": "BK-3001",
        "transporter_name": "Transportes Andinos",
        "truck_plate": "ABC-123",
        "slots_requested": 1,
        "container_numbers": ["ABCD1234567"]
    })).await;
    assert_eq!(response.status(), 200);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap();

    let response = app.post(&format!("/api/v1/reservations/{}/cancel", id), &driver, serde_json::json!({})).await;
    assert_eq!(response.status(), 200);

    let response = app.get(&format!("/api/v1/availability?date={}", MONDAY), &driver).await;
    let body = body_json(response).await;
    let slots = body["slots"].as_array().unwrap();
    assert!(slots.iter().any(|s| s["time"] == "08:00" && s["available"] == 1));
}

#[tokio::test]
async fn misconfigured_schedule_reads_as_no_slots() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let driver = app.login_driver().await;

    // A zero interval is rejected at the admin endpoint.
    let response = app.put("/api/v1/admin/schedule", &admin, serde_json::json!([{
        "day_of_week": 1,
        "start_time": "08:00",
        "end_time": "17:00",
        "interval_minutes": 0,
        "slots_per_interval": 3
    }])).await;
    assert_eq!(response.status(), 400);

    // Force a broken row past the endpoint validation, straight in the DB.
    sqlx::query(
        "INSERT INTO schedule_configs (id, day_of_week, start_time, end_time, interval_minutes, slots_per_interval, is_active, created_at)
         VALUES ('broken', 1, '08:00:00', '17:00:00', -30, 3, 1, '2030-01-01T00:00:00Z')"
    ).execute(&app.pool).await.unwrap();

    let response = app.get(&format!("/api/v1/availability?date={}", MONDAY), &driver).await;
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn availability_requires_authentication() {
    let app = TestApp::new().await;

    use tower::ServiceExt;
    let response = app.router.clone().oneshot(
        axum::http::Request::builder()
            .method("GET")
            .uri(format!("/api/v1/availability?date={}", MONDAY))
            .body(axum::body::Body::empty())
            .unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), 401);
}
