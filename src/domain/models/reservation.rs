use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_EXPIRED: &str = "EXPIRED";

/// Comment written by the expire sweep. Reservations are never deleted;
/// stale active rows are closed out with this marker.
pub const EXPIRED_COMMENT: &str = "Expired automatically: slot time elapsed without completion";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub booking_number: String,
    pub transporter_name: String,
    pub truck_plate: String,
    pub slots_reserved: i32,
    pub container_numbers: Json<Vec<String>>,
    pub api_notes: Option<String>,
    pub status: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_comment: Option<String>,
    pub cancelled_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub user_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub booking_number: String,
    pub transporter_name: String,
    pub truck_plate: String,
    pub slots_reserved: i32,
    pub container_numbers: Vec<String>,
    pub api_notes: Option<String>,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            reservation_date: params.date,
            reservation_time: params.time,
            booking_number: params.booking_number,
            transporter_name: params.transporter_name,
            truck_plate: params.truck_plate,
            slots_reserved: params.slots_reserved,
            container_numbers: Json(params.container_numbers),
            api_notes: params.api_notes,
            status: STATUS_ACTIVE.to_string(),
            cancelled_at: None,
            cancellation_comment: None,
            cancelled_by: None,
            completed_at: None,
            completed_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}
