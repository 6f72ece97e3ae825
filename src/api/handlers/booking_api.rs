use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::warn;

use crate::api::dtos::requests::{RegisterContainerRequest, ValidateBookingRequest};
use crate::api::dtos::responses::{RegistrationResponse, ValidationResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::ports::ContainerRegistration;
use crate::domain::services::container;
use crate::error::AppError;
use crate::state::AppState;

pub async fn validate_booking(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<ValidateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.booking_validation_enabled {
        return Ok(Json(ValidationResponse {
            valid: true,
            message: "Validación deshabilitada".into(),
            data: None,
        }));
    }

    let booking_number = payload.booking_number.trim().to_uppercase();

    match state.booking_api.validate_booking(&booking_number).await {
        Ok(validation) => Ok(Json(ValidationResponse {
            valid: validation.valid,
            message: validation.message,
            data: validation.data,
        })),
        // Fail closed: an unreachable validator reads as "not valid".
        Err(e) => {
            warn!("Booking validation unavailable for {}: {}", booking_number, e);
            Ok(Json(ValidationResponse {
                valid: false,
                message: "Servicio de validación no disponible".into(),
                data: None,
            }))
        }
    }
}

pub async fn register_container(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<RegisterContainerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let normalized = container::normalize(&payload.container_number);

    if !container::is_valid_format(&normalized) {
        return Ok(Json(RegistrationResponse {
            container_number: normalized,
            success: false,
            category: Some(container::CATEGORY_FORMAT.into()),
            message: "El número de contenedor no cumple el formato ISO 6346".into(),
        }));
    }

    if !container::has_valid_check_digit(&normalized) {
        return Ok(Json(RegistrationResponse {
            container_number: normalized,
            success: false,
            category: Some(container::CATEGORY_CHECK_DIGIT.into()),
            message: "El dígito verificador del contenedor no es válido".into(),
        }));
    }

    let account = state.user_repo.find_by_id(&user.id).await?
        .ok_or(AppError::Unauthorized)?;

    let registration = ContainerRegistration {
        booking_number: payload.booking_number.trim().to_uppercase(),
        container_number: normalized.clone(),
        transporter_name: payload.transporter_name,
        truck_plate: payload.truck_plate.trim().to_uppercase(),
        company_name: account.company_name,
        user_id: account.id,
    };

    match state.booking_api.register_container(&registration).await {
        Ok(outcome) if outcome.success => Ok(Json(RegistrationResponse {
            container_number: normalized,
            success: true,
            category: None,
            message: outcome.message,
        })),
        Ok(outcome) => Ok(Json(RegistrationResponse {
            container_number: normalized,
            success: false,
            category: Some(container::classify_registration_error(&outcome.message).into()),
            message: outcome.message,
        })),
        // Registration is display-only and never blocks the reservation
        // flow, so transport errors degrade to a classified failure.
        Err(e) => {
            warn!("Container registration unavailable for {}: {}", normalized, e);
            Ok(Json(RegistrationResponse {
                container_number: normalized,
                success: false,
                category: Some(container::CATEGORY_ERROR.into()),
                message: "Servicio de registro no disponible".into(),
            }))
        }
    }
}
