use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, availability, blocked, booking_api, health, reservation, schedule, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Availability
        .route("/api/v1/availability", get(availability::get_availability))

        // Reservations
        .route("/api/v1/reservations", post(reservation::create_reservation).get(reservation::list_reservations))
        .route("/api/v1/reservations/{id}", get(reservation::get_reservation))
        .route("/api/v1/reservations/{id}/cancel", post(reservation::cancel_reservation))

        // External booking service
        .route("/api/v1/bookings/validate", post(booking_api::validate_booking))
        .route("/api/v1/containers/register", post(booking_api::register_container))

        // Admin: schedules
        .route("/api/v1/admin/schedule", get(schedule::get_weekly_schedule).put(schedule::put_weekly_schedule))
        .route("/api/v1/admin/special-schedules", get(schedule::list_special_schedules).post(schedule::upsert_special_schedule))
        .route("/api/v1/admin/special-schedules/{date}", put(schedule::update_special_schedule).delete(schedule::delete_special_schedule))

        // Admin: blocks
        .route("/api/v1/admin/blocked-dates", get(blocked::list_blocked_dates).post(blocked::create_blocked_date))
        .route("/api/v1/admin/blocked-dates/{id}", delete(blocked::delete_blocked_date))
        .route("/api/v1/admin/blocked-slots", get(blocked::list_blocked_slots).post(blocked::create_blocked_slot))
        .route("/api/v1/admin/blocked-slots/{id}", delete(blocked::delete_blocked_slot))

        // Admin: users
        .route("/api/v1/admin/users", post(user::create_user).get(user::list_users))
        .route("/api/v1/admin/users/{id}", delete(user::delete_user))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
