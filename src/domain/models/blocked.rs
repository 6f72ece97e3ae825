use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A calendar date fully excluded from booking. A date counts as blocked
/// while any active row exists for it; rows are deactivated, not deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BlockedDate {
    pub id: String,
    pub date: NaiveDate,
    pub reason: String,
    pub block_type: String, // "HOLIDAY" | "MAINTENANCE" | "OTHER"
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(date: NaiveDate, reason: String, block_type: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            reason,
            block_type,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// A time range excluded from booking, either for one date or recurring
/// daily (`date` is NULL and `is_recurring` set). A generated slot starting
/// at T is blocked when start_time <= T < end_time.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BlockedSlot {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: String,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl BlockedSlot {
    pub fn new(
        date: Option<NaiveDate>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        reason: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            is_recurring: date.is_none(),
            date,
            start_time,
            end_time,
            reason,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Whether this block applies to the given calendar date at all.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.is_active && (self.is_recurring || self.date == Some(date))
    }

    /// Half-open interval check: a slot exactly at `end_time` is not blocked.
    pub fn covers(&self, slot_start: NaiveTime) -> bool {
        self.start_time <= slot_start && slot_start < self.end_time
    }
}
