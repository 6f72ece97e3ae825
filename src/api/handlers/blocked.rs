use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateBlockedDateRequest, CreateBlockedSlotRequest};
use crate::api::handlers::{parse_date, parse_time, require_admin};
use crate::domain::models::blocked::{BlockedDate, BlockedSlot};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const BLOCK_TYPES: [&str; 3] = ["HOLIDAY", "MAINTENANCE", "OTHER"];

pub async fn list_blocked_dates(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let dates = state.block_repo.list_blocked_dates().await?;
    Ok(Json(dates))
}

pub async fn create_blocked_date(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<CreateBlockedDateRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let date = parse_date(&payload.date)?;
    if !BLOCK_TYPES.contains(&payload.block_type.as_str()) {
        return Err(AppError::Validation(format!(
            "block_type: unknown type '{}'",
            payload.block_type
        )));
    }
    if payload.reason.trim().is_empty() {
        return Err(AppError::Validation("reason: must not be empty".into()));
    }

    let blocked = BlockedDate::new(date, payload.reason, payload.block_type);
    let created = state.block_repo.create_blocked_date(&blocked).await?;

    info!("Blocked date {} ({})", created.date, created.block_type);

    Ok(Json(created))
}

pub async fn delete_blocked_date(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    state.block_repo.delete_blocked_date(&id).await?;

    info!("Unblocked date entry {}", id);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn list_blocked_slots(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let slots = state.block_repo.list_blocked_slots().await?;
    Ok(Json(slots))
}

pub async fn create_blocked_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<CreateBlockedSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let date = match payload.date.as_deref() {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    let start = parse_time(&payload.start_time)?;
    let end = parse_time(&payload.end_time)?;

    if start >= end {
        return Err(AppError::Validation("start_time: must be before end_time".into()));
    }
    if payload.reason.trim().is_empty() {
        return Err(AppError::Validation("reason: must not be empty".into()));
    }

    let blocked = BlockedSlot::new(date, start, end, payload.reason);
    let created = state.block_repo.create_blocked_slot(&blocked).await?;

    info!(
        "Blocked slot range {}-{} ({})",
        created.start_time,
        created.end_time,
        if created.is_recurring { "recurring" } else { "one date" }
    );

    Ok(Json(created))
}

pub async fn delete_blocked_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    state.block_repo.delete_blocked_slot(&id).await?;

    info!("Unblocked slot entry {}", id);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}
