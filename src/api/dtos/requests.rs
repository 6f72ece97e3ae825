use serde::Deserialize;

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    crate::domain::models::user::ROLE_USER.to_string()
}

/// Weekly rule for one weekday. Times arrive as "HH:MM" strings from the
/// frontend; handlers parse them.
#[derive(Deserialize)]
pub struct UpsertWeeklyScheduleRequest {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub interval_minutes: i32,
    pub slots_per_interval: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct UpsertSpecialScheduleRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub interval_minutes: i32,
    pub slots_per_interval: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub restricted_access: bool,
    pub description: Option<String>,
    /// Only consulted when `restricted_access` is set.
    #[serde(default)]
    pub authorized_user_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateBlockedDateRequest {
    pub date: String,
    pub reason: String,
    #[serde(default = "default_block_type")]
    pub block_type: String,
}

fn default_block_type() -> String {
    "OTHER".to_string()
}

#[derive(Deserialize)]
pub struct CreateBlockedSlotRequest {
    /// None makes the block recurring (applies every day).
    pub date: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub reservation_date: String,
    pub reservation_time: String,
    pub booking_number: String,
    pub transporter_name: String,
    pub truck_plate: String,
    pub slots_requested: i32,
    pub container_numbers: Vec<String>,
    pub api_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelReservationRequest {
    #[serde(default)]
    pub cancellation_comment: Option<String>,
}

#[derive(Deserialize)]
pub struct ValidateBookingRequest {
    pub booking_number: String,
}

#[derive(Deserialize)]
pub struct RegisterContainerRequest {
    pub booking_number: String,
    pub container_number: String,
    pub transporter_name: String,
    pub truck_plate: String,
}
