pub mod auth;
pub mod availability;
pub mod blocked;
pub mod booking_api;
pub mod health;
pub mod reservation;
pub mod schedule;
pub mod user;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::models::user::User;
use crate::error::AppError;

pub(crate) fn require_admin(user: &User) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".into()))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw)))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid time (expected HH:MM)", raw)))
}
