use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::api::dtos::responses::{AvailabilityResponse, SlotView};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::parse_date;
use crate::domain::models::user::User;
use crate::domain::services::slots::{apply_reserved, bookable_slots, resolve_plan, SlotPlan};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

/// Resolves which slot plan (if any) governs `date` for this requester.
/// Restricted specials consult the allow-list; admins always pass.
pub(crate) async fn plan_for_date(
    state: &AppState,
    date: NaiveDate,
    requester: &User,
) -> Result<Option<SlotPlan>, AppError> {
    let special = state.schedule_repo.find_special_by_date(date).await?;

    let authorized = match &special {
        Some(s) if s.is_active && s.restricted_access => {
            requester.is_admin()
                || state
                    .schedule_repo
                    .list_special_user_ids(&s.id)
                    .await?
                    .contains(&requester.id)
        }
        _ => true,
    };

    let day_of_week = chrono::Datelike::weekday(&date).num_days_from_sunday() as i32;
    let weekly = state.schedule_repo.find_weekly(day_of_week).await?;

    Ok(resolve_plan(weekly.as_ref(), special.as_ref(), authorized))
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&query.date)?;

    if let Some(block) = state.block_repo.active_blocked_dates(date).await?.first() {
        return Ok(Json(AvailabilityResponse {
            date: date.to_string(),
            blocked: true,
            reason: Some(block.reason.clone()),
            slots: Vec::new(),
        }));
    }

    let now = state.local_now();
    let candidates = match plan_for_date(&state, date, &user).await? {
        None => Vec::new(),
        Some(plan) => {
            let blocked_slots = state.block_repo.blocked_slots_for_date(date).await?;
            match bookable_slots(&plan, &blocked_slots, date, now) {
                Ok(slots) => slots,
                // Never a 500: a broken schedule row reads as a day
                // with no slots until an admin fixes it.
                Err(e) => {
                    error!("Schedule misconfiguration for {}: {}", date, e);
                    Vec::new()
                }
            }
        }
    };

    let reserved = state.reservation_repo.reserved_by_time(date).await?;
    let slots: Vec<SlotView> = apply_reserved(candidates, &reserved)
        .into_iter()
        .map(SlotView::from)
        .collect();

    Ok(Json(AvailabilityResponse {
        date: date.to_string(),
        blocked: false,
        reason: None,
        slots,
    }))
}
