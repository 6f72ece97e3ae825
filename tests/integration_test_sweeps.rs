mod common;

use chrono::{Days, NaiveDate, NaiveTime};
use common::TestApp;
use dock_reservations::background::{run_complete_sweep, run_expire_sweep};
use uuid::Uuid;

async fn seed_active_reservation(app: &TestApp, date: NaiveDate, time: NaiveTime) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO reservations (id, user_id, reservation_date, reservation_time, booking_number, transporter_name, truck_plate, slots_reserved, container_numbers, api_notes, status, created_at)
         VALUES (?, ?, ?, ?, 'BK-SEED', 'Transportes Andinos', 'ABC-123', 1, '[\"ABCD1234567\"]', NULL, 'ACTIVE', ?)"
    )
        .bind(&id)
        .bind(&app.driver_id)
        .bind(date)
        .bind(time)
        .bind(chrono::Utc::now())
        .execute(&app.pool)
        .await
        .unwrap();
    id
}

async fn status_of(app: &TestApp, id: &str) -> String {
    sqlx::query_scalar("SELECT status FROM reservations WHERE id = ?")
        .bind(id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn sweeps_split_stale_rows_between_complete_and_expire() {
    let app = TestApp::new().await;
    let now = app.state.local_now();
    let today = now.date();
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    let yesterday = seed_active_reservation(&app, today.checked_sub_days(Days::new(1)).unwrap(), ten).await;
    let three_days_old = seed_active_reservation(&app, today.checked_sub_days(Days::new(3)).unwrap(), ten).await;
    let future = seed_active_reservation(&app, today.checked_add_days(Days::new(5)).unwrap(), ten).await;

    // The complete sweep leaves expire-owned rows for the expire sweep.
    let completed = run_complete_sweep(&app.state).await.unwrap();
    assert_eq!(completed, 1);
    assert_eq!(status_of(&app, &yesterday).await, "COMPLETED");
    assert_eq!(status_of(&app, &three_days_old).await, "ACTIVE");
    assert_eq!(status_of(&app, &future).await, "ACTIVE");

    let expired = run_expire_sweep(&app.state).await.unwrap();
    assert_eq!(expired, 1);
    assert_eq!(status_of(&app, &three_days_old).await, "EXPIRED");
    assert_eq!(status_of(&app, &future).await, "ACTIVE");
}

#[tokio::test]
async fn sweeps_are_idempotent() {
    let app = TestApp::new().await;
    let now = app.state.local_now();
    let today = now.date();
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    seed_active_reservation(&app, today.checked_sub_days(Days::new(1)).unwrap(), ten).await;
    seed_active_reservation(&app, today.checked_sub_days(Days::new(4)).unwrap(), ten).await;

    assert_eq!(run_complete_sweep(&app.state).await.unwrap(), 1);
    assert_eq!(run_expire_sweep(&app.state).await.unwrap(), 1);

    assert_eq!(run_complete_sweep(&app.state).await.unwrap(), 0);
    assert_eq!(run_expire_sweep(&app.state).await.unwrap(), 0);
}

#[tokio::test]
async fn expire_sweep_records_audit_trail() {
    let app = TestApp::new().await;
    let today = app.state.local_now().date();
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    let id = seed_active_reservation(&app, today.checked_sub_days(Days::new(3)).unwrap(), ten).await;
    run_expire_sweep(&app.state).await.unwrap();

    let (status, cancelled_by, comment): (String, Option<String>, Option<String>) = sqlx::query_as(
        "SELECT status, cancelled_by, cancellation_comment FROM reservations WHERE id = ?"
    ).bind(&id).fetch_one(&app.pool).await.unwrap();

    assert_eq!(status, "EXPIRED");
    assert_eq!(cancelled_by.as_deref(), Some("SYSTEM"));
    assert!(comment.unwrap().contains("Expired automatically"));
}

#[tokio::test]
async fn complete_sweep_records_system_actor() {
    let app = TestApp::new().await;
    let today = app.state.local_now().date();
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    let id = seed_active_reservation(&app, today.checked_sub_days(Days::new(1)).unwrap(), ten).await;
    run_complete_sweep(&app.state).await.unwrap();

    let (status, completed_by): (String, Option<String>) = sqlx::query_as(
        "SELECT status, completed_by FROM reservations WHERE id = ?"
    ).bind(&id).fetch_one(&app.pool).await.unwrap();

    assert_eq!(status, "COMPLETED");
    assert_eq!(completed_by.as_deref(), Some("SYSTEM"));
}

// Cancelled rows are terminal; no sweep resurrects or reclassifies them.
#[tokio::test]
async fn sweeps_ignore_non_active_rows() {
    let app = TestApp::new().await;
    let today = app.state.local_now().date();
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    let id = seed_active_reservation(&app, today.checked_sub_days(Days::new(3)).unwrap(), ten).await;
    sqlx::query("UPDATE reservations SET status = 'CANCELLED' WHERE id = ?")
        .bind(&id).execute(&app.pool).await.unwrap();

    assert_eq!(run_complete_sweep(&app.state).await.unwrap(), 0);
    assert_eq!(run_expire_sweep(&app.state).await.unwrap(), 0);
    assert_eq!(status_of(&app, &id).await, "CANCELLED");
}
