mod common;

use common::{body_json, TestApp};

const MONDAY: &str = "2030-06-03";

fn reservation_payload(time: &str, booking: &str, slots: i32, containers: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "reservation_date": MONDAY,
        "reservation_time": time,
        "booking_number": booking,
        "transporter_name": "Transportes Andinos",
        "truck_plate": "abc-123",
        "slots_requested": slots,
        "container_numbers": containers
    })
}

#[tokio::test]
async fn admission_normalizes_containers_and_plate() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "bk-1001", 1, vec!["abcd 1234567"])).await;
    assert_eq!(response.status(), 200);

    let created = body_json(response).await;
    assert_eq!(created["container_numbers"][0], "ABCD1234567");
    assert_eq!(created["truck_plate"], "ABC-123");
    assert_eq!(created["booking_number"], "BK-1001");
    assert_eq!(created["status"], "ACTIVE");
}

#[tokio::test]
async fn malformed_container_number_is_rejected() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    // Six serial digits instead of seven.
    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD123456"])).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn container_count_must_match_slots_requested() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567", "EFGH1234567"])).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn slots_requested_outside_one_or_two_is_rejected() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 3,
            vec!["ABCD1234567", "EFGH1234567", "IJKL1234567"])).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn past_dates_are_rejected() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver, serde_json::json!({
        "reservation_date": "2020-06-01",
        "reservation_time": "10:00",
        "booking_number": "BK-1001",
        "transporter_name": "Transportes Andinos",
        "truck_plate": "ABC-123",
        "slots_requested": 1,
        "container_numbers": ["ABCD1234567"]
    })).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn new_booking_may_reserve_only_one_slot() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 2, vec!["ABCD1234567", "EFGH1234567"])).await;
    assert_eq!(response.status(), 409);

    // After a first single-slot reservation the same booking may take two.
    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    assert_eq!(response.status(), 200);

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("11:00", "BK-1001", 2, vec!["EFGH1234567", "IJKL1234567"])).await;
    assert_eq!(response.status(), 200);
    let created = body_json(response).await;
    assert_eq!(created["slots_reserved"], 2);
}

#[tokio::test]
async fn admission_stops_at_slot_capacity() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(1).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    assert_eq!(response.status(), 200);

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1002", 1, vec!["EFGH1234567"])).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn nonexistent_slot_time_is_rejected() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    // Off-grid time: the cadence is on the half hour.
    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:15", "BK-1001", 1, vec!["ABCD1234567"])).await;
    assert_eq!(response.status(), 409);

    // Outside the window entirely.
    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("22:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn drivers_see_own_reservations_admins_see_all() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let admin = app.login_admin().await;
    let driver = app.login_driver().await;

    app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    app.post("/api/v1/reservations", &admin,
        reservation_payload("11:00", "BK-2001", 1, vec!["EFGH1234567"])).await;

    let response = app.get("/api/v1/reservations", &driver).await;
    let own = body_json(response).await;
    assert_eq!(own.as_array().unwrap().len(), 1);

    let response = app.get("/api/v1/reservations?all=true", &admin).await;
    let all = body_json(response).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    // The all switch is admin only.
    let response = app.get("/api/v1/reservations?all=true", &driver).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn reservation_detail_is_owner_or_admin() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let admin = app.login_admin().await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &admin,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap();

    let response = app.get(&format!("/api/v1/reservations/{}", id), &driver).await;
    assert_eq!(response.status(), 403);

    let response = app.get(&format!("/api/v1/reservations/{}", id), &admin).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn owner_cancellation_notifies_operations() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.post(&format!("/api/v1/reservations/{}/cancel", id), &driver,
        serde_json::json!({"cancellation_comment": "Camión averiado"})).await;
    assert_eq!(response.status(), 200);

    let cancelled = body_json(response).await;
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["cancellation_comment"], "Camión averiado");
    assert_eq!(cancelled["cancelled_by"], app.driver_id);

    // The notification task is fire-and-forget; give it a beat.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let sent = app.email.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "operaciones@example.com");
}

#[tokio::test]
async fn admin_cancellation_notifies_the_owner() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let admin = app.login_admin().await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &driver,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.post(&format!("/api/v1/reservations/{}/cancel", id), &admin,
        serde_json::json!({})).await;
    assert_eq!(response.status(), 200);

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let sent = app.email.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "driver1@example.com");
}

#[tokio::test]
async fn cancellation_is_owner_or_admin_and_single_shot() {
    let app = TestApp::new().await;
    app.seed_weekday_schedule(3).await;
    let admin = app.login_admin().await;
    let driver = app.login_driver().await;

    let response = app.post("/api/v1/reservations", &admin,
        reservation_payload("10:00", "BK-1001", 1, vec!["ABCD1234567"])).await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.post(&format!("/api/v1/reservations/{}/cancel", id), &driver,
        serde_json::json!({})).await;
    assert_eq!(response.status(), 403);

    let response = app.post(&format!("/api/v1/reservations/{}/cancel", id), &admin,
        serde_json::json!({})).await;
    assert_eq!(response.status(), 200);

    // Already cancelled: the row never goes back to ACTIVE.
    let response = app.post(&format!("/api/v1/reservations/{}/cancel", id), &admin,
        serde_json::json!({})).await;
    assert_eq!(response.status(), 409);
}
