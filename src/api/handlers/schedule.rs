use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{UpsertSpecialScheduleRequest, UpsertWeeklyScheduleRequest};
use crate::api::handlers::{parse_date, parse_time, require_admin};
use crate::domain::models::schedule::{NewSpecialScheduleParams, ScheduleConfig, SpecialSchedule};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn check_plan_shape(start: chrono::NaiveTime, end: chrono::NaiveTime, interval: i32, capacity: i32) -> Result<(), AppError> {
    if interval <= 0 {
        return Err(AppError::Validation("interval_minutes: must be positive".into()));
    }
    if start >= end {
        return Err(AppError::Validation("start_time: must be before end_time".into()));
    }
    if capacity <= 0 {
        return Err(AppError::Validation("slots_per_interval: must be positive".into()));
    }
    Ok(())
}

pub async fn get_weekly_schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let configs = state.schedule_repo.list_weekly().await?;
    Ok(Json(configs))
}

/// Upserts the full weekly grid in one request. Each entry replaces the rule
/// for its weekday; weekdays not listed are left untouched.
pub async fn put_weekly_schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<Vec<UpsertWeeklyScheduleRequest>>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let mut saved = Vec::with_capacity(payload.len());
    for entry in payload {
        if !(0..=6).contains(&entry.day_of_week) {
            return Err(AppError::Validation(format!(
                "day_of_week: {} is out of range (0 = Sunday .. 6 = Saturday)",
                entry.day_of_week
            )));
        }

        let start = parse_time(&entry.start_time)?;
        let end = parse_time(&entry.end_time)?;
        check_plan_shape(start, end, entry.interval_minutes, entry.slots_per_interval)?;

        let mut config = ScheduleConfig::new(
            entry.day_of_week,
            start,
            end,
            entry.interval_minutes,
            entry.slots_per_interval,
        );
        config.is_active = entry.is_active;

        saved.push(state.schedule_repo.upsert_weekly(&config).await?);
    }

    info!("Weekly schedule updated: {} day(s)", saved.len());

    Ok(Json(saved))
}

pub async fn list_special_schedules(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let specials = state.schedule_repo.list_specials().await?;
    let mut enriched = Vec::with_capacity(specials.len());
    for special in specials {
        let user_ids = if special.restricted_access {
            state.schedule_repo.list_special_user_ids(&special.id).await?
        } else {
            Vec::new()
        };
        enriched.push(serde_json::json!({
            "id": special.id,
            "date": special.date,
            "start_time": special.start_time,
            "end_time": special.end_time,
            "interval_minutes": special.interval_minutes,
            "slots_per_interval": special.slots_per_interval,
            "is_active": special.is_active,
            "restricted_access": special.restricted_access,
            "description": special.description,
            "authorized_user_ids": user_ids,
            "created_at": special.created_at
        }));
    }

    Ok(Json(enriched))
}

pub async fn upsert_special_schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<UpsertSpecialScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let date = parse_date(&payload.date)?;
    let start = parse_time(&payload.start_time)?;
    let end = parse_time(&payload.end_time)?;
    check_plan_shape(start, end, payload.interval_minutes, payload.slots_per_interval)?;

    if payload.restricted_access && payload.authorized_user_ids.is_empty() {
        return Err(AppError::Validation(
            "authorized_user_ids: a restricted schedule needs at least one authorized user".into(),
        ));
    }

    let mut special = SpecialSchedule::new(NewSpecialScheduleParams {
        date,
        start_time: start,
        end_time: end,
        interval_minutes: payload.interval_minutes,
        slots_per_interval: payload.slots_per_interval,
        restricted_access: payload.restricted_access,
        description: payload.description,
    });
    special.is_active = payload.is_active;

    let saved = state.schedule_repo
        .upsert_special(&special, &payload.authorized_user_ids)
        .await?;

    info!("Special schedule saved for {}", saved.date);

    Ok(Json(saved))
}

/// PUT variant keyed by path date; the path wins over whatever date the
/// body carries.
pub async fn update_special_schedule(
    state: State<Arc<AppState>>,
    admin: AuthUser,
    Path(date): Path<String>,
    Json(mut payload): Json<UpsertSpecialScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.date = date;
    upsert_special_schedule(state, admin, Json(payload)).await
}

pub async fn delete_special_schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let date = parse_date(&date)?;
    state.schedule_repo.find_special_by_date(date).await?
        .ok_or(AppError::NotFound("Special schedule not found".into()))?;

    state.schedule_repo.delete_special(date).await?;

    info!("Special schedule deleted for {}", date);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}
