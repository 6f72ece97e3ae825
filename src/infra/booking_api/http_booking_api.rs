use std::time::Duration;

use crate::domain::ports::{BookingApiClient, BookingValidation, ContainerRegistration, RegistrationOutcome};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, warn};

/// Client for the port authority's booking/container service. Callers
/// decide the failure policy: validation fails closed, registration is
/// advisory.
pub struct HttpBookingApi {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HttpBookingApi {
    pub fn new(base_url: String, api_token: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, base_url, api_token }
    }
}

#[derive(Deserialize)]
struct RemoteRegistrationResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl BookingApiClient for HttpBookingApi {
    async fn validate_booking(&self, booking_number: &str) -> Result<BookingValidation, AppError> {
        let url = format!("{}/bookings/{}/validate", self.base_url, booking_number);
        let res = self.client.get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await
            .map_err(|e| {
                error!("Booking validation request failed: {}", e);
                AppError::ExternalService(format!("booking validation unreachable: {}", e))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            warn!("Booking validation returned status {}", status);
            return Err(AppError::ExternalService(format!("booking validation status {}", status)));
        }

        res.json::<BookingValidation>().await.map_err(|e| {
            error!("Booking validation returned malformed payload: {}", e);
            AppError::ExternalService(format!("booking validation payload: {}", e))
        })
    }

    async fn register_container(&self, registration: &ContainerRegistration) -> Result<RegistrationOutcome, AppError> {
        let url = format!("{}/containers/register", self.base_url);
        let res = self.client.post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(registration)
            .send()
            .await
            .map_err(|e| {
                error!("Container registration request failed: {}", e);
                AppError::ExternalService(format!("container registration unreachable: {}", e))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Ok(RegistrationOutcome {
                success: false,
                message: format!("status {}: {}", status, text),
            });
        }

        let body = res.json::<RemoteRegistrationResponse>().await.map_err(|e| {
            error!("Container registration returned malformed payload: {}", e);
            AppError::ExternalService(format!("container registration payload: {}", e))
        })?;

        Ok(RegistrationOutcome {
            success: body.success,
            message: body.message,
        })
    }
}
