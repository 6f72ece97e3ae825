use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::dtos::requests::{CancelReservationRequest, CreateReservationRequest};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::availability::plan_for_date;
use crate::api::handlers::{parse_date, parse_time};
use crate::domain::models::reservation::{NewReservationParams, Reservation};
use crate::domain::services::container;
use crate::domain::services::slots::bookable_slots;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&payload.reservation_date)?;
    let time = parse_time(&payload.reservation_time)?;

    if payload.slots_requested != 1 && payload.slots_requested != 2 {
        return Err(AppError::Validation("slots_requested: must be 1 or 2".into()));
    }

    let booking_number = payload.booking_number.trim().to_uppercase();
    if booking_number.is_empty() {
        return Err(AppError::Validation("booking_number: must not be empty".into()));
    }

    let mut containers = Vec::with_capacity(payload.container_numbers.len());
    for raw in &payload.container_numbers {
        let normalized = container::normalize(raw);
        if !container::is_valid_format(&normalized) {
            return Err(AppError::Validation(format!(
                "container_numbers: '{}' is not a valid container number",
                raw
            )));
        }
        containers.push(normalized);
    }

    if containers.len() != payload.slots_requested as usize {
        return Err(AppError::Validation(format!(
            "container_numbers: expected {} container number(s), got {}",
            payload.slots_requested,
            containers.len()
        )));
    }

    let now = state.local_now();
    if date < now.date() || (date == now.date() && time < now.time()) {
        return Err(AppError::Conflict("reservation_date: cannot reserve in the past".into()));
    }

    if !state.block_repo.active_blocked_dates(date).await?.is_empty() {
        return Err(AppError::Conflict("reservation_date: date is blocked".into()));
    }

    // A booking's first reservation may hold one slot only. Re-checked
    // inside the admission transaction; this is the fast path.
    if payload.slots_requested == 2
        && state.reservation_repo.count_by_booking_number(&booking_number).await? == 0
    {
        return Err(AppError::Conflict(
            "booking_number: a new booking may reserve only one slot".into(),
        ));
    }

    let plan = plan_for_date(&state, date, &user).await?
        .ok_or_else(|| AppError::Conflict("reservation_time: no schedule configured for this date".into()))?;

    let blocked_slots = state.block_repo.blocked_slots_for_date(date).await?;
    let candidates = bookable_slots(&plan, &blocked_slots, date, now).map_err(|e| {
        error!("Schedule misconfiguration for {}: {}", date, e);
        AppError::Conflict("reservation_time: selected time slot is not available".into())
    })?;

    let capacity = candidates
        .iter()
        .find(|slot| slot.time == time)
        .map(|slot| slot.capacity)
        .ok_or_else(|| AppError::Conflict("reservation_time: selected time slot is not available".into()))?;

    let reservation = Reservation::new(NewReservationParams {
        user_id: user.id.clone(),
        date,
        time,
        booking_number,
        transporter_name: payload.transporter_name,
        truck_plate: payload.truck_plate.trim().to_uppercase(),
        slots_reserved: payload.slots_requested,
        container_numbers: containers,
        api_notes: payload.api_notes,
    });

    let created = state.reservation_repo.admit(&reservation, capacity).await?;

    info!(
        "Reservation {} admitted: {} {} x{}",
        created.id, created.reservation_date, created.reservation_time, created.slots_reserved
    );

    Ok(Json(created))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub all: bool,
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.all {
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin role required".into()));
        }
        return Ok(Json(state.reservation_repo.list_all().await?));
    }

    Ok(Json(state.reservation_repo.list_by_user(&user.id).await?))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;

    if !user.is_admin() && reservation.user_id != user.id {
        return Err(AppError::Forbidden("Not your reservation".into()));
    }

    Ok(Json(reservation))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CancelReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;

    if !user.is_admin() && reservation.user_id != user.id {
        return Err(AppError::Forbidden("Not your reservation".into()));
    }

    let cancelled = state.reservation_repo
        .cancel(&id, &user.id, payload.cancellation_comment)
        .await?;

    info!("Reservation {} cancelled by {}", cancelled.id, user.id);

    notify_cancellation(state.clone(), cancelled.clone(), user.id.clone()).await;

    Ok(Json(cancelled))
}

/// Fire-and-forget. The cancellation is already committed; a mail failure
/// only gets logged.
async fn notify_cancellation(state: Arc<AppState>, reservation: Reservation, actor_id: String) {
    tokio::spawn(async move {
        if let Err(e) = send_cancellation_email(&state, &reservation, &actor_id).await {
            warn!("Cancellation notice for {} not sent: {}", reservation.id, e);
        }
    });
}

async fn send_cancellation_email(
    state: &AppState,
    reservation: &Reservation,
    actor_id: &str,
) -> Result<(), AppError> {
    let owner = state.user_repo.find_by_id(&reservation.user_id).await?
        .ok_or(AppError::NotFound("Reservation owner not found".into()))?;

    let actor = if actor_id == owner.id {
        owner.clone()
    } else {
        state.user_repo.find_by_id(actor_id).await?
            .ok_or(AppError::NotFound("Cancelling user not found".into()))?
    };

    // Owner-initiated cancellations alert operations staff; admin-initiated
    // ones alert the owner.
    let recipient = if actor.id == owner.id {
        state.config.admin_notification_email.clone()
    } else {
        owner.email.clone()
    };

    let mut context = tera::Context::new();
    context.insert("actor", &actor.username);
    context.insert("date", &reservation.reservation_date.to_string());
    context.insert("time", &reservation.reservation_time.format("%H:%M").to_string());
    context.insert("booking_number", &reservation.booking_number);
    context.insert("transporter", &reservation.transporter_name);
    context.insert("plate", &reservation.truck_plate);
    context.insert("comment", &reservation.cancellation_comment);

    let html = state.templates.render("cancellation.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

    let subject = format!(
        "Reserva cancelada: {} {}",
        reservation.reservation_date,
        reservation.reservation_time.format("%H:%M")
    );

    state.email_service.send(&recipient, &subject, &html).await
}
