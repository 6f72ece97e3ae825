use crate::domain::models::{
    auth::RefreshTokenRecord,
    blocked::{BlockedDate, BlockedSlot},
    reservation::Reservation,
    schedule::{ScheduleConfig, SpecialSchedule},
    user::User,
};
use crate::domain::services::lifecycle::SweepWindow;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn count_admins(&self) -> Result<i64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn upsert_weekly(&self, config: &ScheduleConfig) -> Result<ScheduleConfig, AppError>;
    async fn find_weekly(&self, day_of_week: i32) -> Result<Option<ScheduleConfig>, AppError>;
    async fn list_weekly(&self) -> Result<Vec<ScheduleConfig>, AppError>;

    async fn upsert_special(
        &self,
        special: &SpecialSchedule,
        authorized_user_ids: &[String],
    ) -> Result<SpecialSchedule, AppError>;
    async fn find_special_by_date(&self, date: NaiveDate) -> Result<Option<SpecialSchedule>, AppError>;
    async fn list_specials(&self) -> Result<Vec<SpecialSchedule>, AppError>;
    async fn list_special_user_ids(&self, special_id: &str) -> Result<Vec<String>, AppError>;
    async fn delete_special(&self, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn create_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError>;
    async fn list_blocked_dates(&self) -> Result<Vec<BlockedDate>, AppError>;
    async fn active_blocked_dates(&self, date: NaiveDate) -> Result<Vec<BlockedDate>, AppError>;
    async fn delete_blocked_date(&self, id: &str) -> Result<(), AppError>;

    async fn create_blocked_slot(&self, blocked: &BlockedSlot) -> Result<BlockedSlot, AppError>;
    async fn list_blocked_slots(&self) -> Result<Vec<BlockedSlot>, AppError>;
    /// Active blocks applicable to a date: date-specific plus recurring.
    async fn blocked_slots_for_date(&self, date: NaiveDate) -> Result<Vec<BlockedSlot>, AppError>;
    async fn delete_blocked_slot(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Admission commit: re-checks the new-booking rule and the remaining
    /// capacity for (date, time) and inserts, all inside one transaction so
    /// concurrent admissions for the last free slot cannot both succeed.
    async fn admit(&self, reservation: &Reservation, slot_capacity: i32) -> Result<Reservation, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Reservation>, AppError>;
    async fn list_all(&self) -> Result<Vec<Reservation>, AppError>;

    /// Summed `slots_reserved` of active reservations on a date, per time.
    async fn reserved_by_time(&self, date: NaiveDate) -> Result<Vec<(NaiveTime, i64)>, AppError>;
    async fn count_by_booking_number(&self, booking_number: &str) -> Result<i64, AppError>;

    async fn cancel(
        &self,
        id: &str,
        cancelled_by: &str,
        comment: Option<String>,
    ) -> Result<Reservation, AppError>;

    /// Complete sweep: active rows strictly before now, excluding
    /// expire-owned rows. Returns the number of rows transitioned.
    async fn complete_elapsed(&self, window: SweepWindow) -> Result<u64, AppError>;
    /// Expire sweep: active rows past the expire threshold.
    async fn expire_stale(&self, window: SweepWindow) -> Result<u64, AppError>;
}

#[derive(Debug, Deserialize)]
pub struct BookingValidation {
    pub valid: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ContainerRegistration {
    pub booking_number: String,
    pub container_number: String,
    pub transporter_name: String,
    pub truck_plate: String,
    pub company_name: String,
    pub user_id: String,
}

#[derive(Debug)]
pub struct RegistrationOutcome {
    pub success: bool,
    pub message: String,
}

/// Narrow seam to the external booking/container service so the admission
/// and availability core carries no network dependency.
#[async_trait]
pub trait BookingApiClient: Send + Sync {
    async fn validate_booking(&self, booking_number: &str) -> Result<BookingValidation, AppError>;
    async fn register_container(&self, registration: &ContainerRegistration) -> Result<RegistrationOutcome, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
