use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Recurring per-weekday slot generation rule. At most one row per weekday
/// (0 = Sunday .. 6 = Saturday), enforced by a unique index.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ScheduleConfig {
    pub id: String,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interval_minutes: i32,
    pub slots_per_interval: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ScheduleConfig {
    pub fn new(
        day_of_week: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
        interval_minutes: i32,
        slots_per_interval: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week,
            start_time,
            end_time,
            interval_minutes,
            slots_per_interval,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// One-off override of the weekly rule for a specific date. When
/// `restricted_access` is set, only users in the allow-list
/// (`special_schedule_users`) see its slots.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SpecialSchedule {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interval_minutes: i32,
    pub slots_per_interval: i32,
    pub is_active: bool,
    pub restricted_access: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewSpecialScheduleParams {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interval_minutes: i32,
    pub slots_per_interval: i32,
    pub restricted_access: bool,
    pub description: Option<String>,
}

impl SpecialSchedule {
    pub fn new(params: NewSpecialScheduleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            interval_minutes: params.interval_minutes,
            slots_per_interval: params.slots_per_interval,
            is_active: true,
            restricted_access: params.restricted_access,
            description: params.description,
            created_at: Utc::now(),
        }
    }
}
