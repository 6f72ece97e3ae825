use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateUserRequest;
use crate::api::handlers::require_admin;
use crate::domain::models::user::{User, ROLE_ADMIN, ROLE_USER};
use crate::error::AppError;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::{info, error};

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    if payload.role != ROLE_ADMIN && payload.role != ROLE_USER {
        return Err(AppError::Validation(format!("role: unknown role '{}'", payload.role)));
    }

    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User::new(
        payload.username,
        payload.email,
        password_hash,
        payload.company_name,
        payload.role,
    );
    let created = state.user_repo.create(&user).await?;

    info!("Created user: {}", created.id);

    Ok(Json(serde_json::json!({
        "id": created.id,
        "username": created.username,
        "email": created.email,
        "company_name": created.company_name,
        "role": created.role,
        "created_at": created.created_at
    })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let users = state.user_repo.list().await?;
    let safe_users: Vec<_> = users.into_iter().map(|u| serde_json::json!({
        "id": u.id,
        "username": u.username,
        "email": u.email,
        "company_name": u.company_name,
        "role": u.role,
        "created_at": u.created_at
    })).collect();

    Ok(Json(safe_users))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    if admin.id == user_id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    match state.user_repo.delete(&target.id).await {
        Ok(_) => {
            info!("Deleted user {}", user_id);
            Ok(Json(serde_json::json!({"status": "deleted"})))
        },
        Err(e) => {
            error!("Failed to delete user {}: {:?}", user_id, e);
            Err(e)
        }
    }
}
