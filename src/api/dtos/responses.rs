use serde::Serialize;

use crate::domain::services::slots::AvailableSlot;

#[derive(Serialize)]
pub struct SlotView {
    pub time: String,
    pub capacity: i32,
    pub available: i32,
}

impl From<AvailableSlot> for SlotView {
    fn from(slot: AvailableSlot) -> Self {
        Self {
            time: slot.time.format("%H:%M").to_string(),
            capacity: slot.capacity,
            available: slot.available,
        }
    }
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct RegistrationResponse {
    pub container_number: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
}
