use std::sync::Arc;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tera::Tera;

use crate::config::Config;
use crate::domain::ports::{
    AuthRepository, BlockRepository, BookingApiClient, EmailService,
    ReservationRepository, ScheduleRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub timezone: Tz,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub block_repo: Arc<dyn BlockRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub booking_api: Arc<dyn BookingApiClient>,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Facility-local wall clock; the reference point for every temporal
    /// rule in availability, admission and the sweeps.
    pub fn local_now(&self) -> NaiveDateTime {
        self.local_from(Utc::now())
    }

    pub fn local_from(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.timezone).naive_local()
    }
}
