use dock_reservations::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_block_repo::SqliteBlockRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
        sqlite_schedule_repo::SqliteScheduleRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    infra::factory::hash_password,
    domain::models::user::{User, ROLE_ADMIN, ROLE_USER},
    domain::ports::{
        BookingApiClient, BookingValidation, ContainerRegistration, EmailService,
        RegistrationOutcome, UserRepository,
    },
    domain::services::auth_service::AuthService,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use async_trait::async_trait;
use tera::Tera;
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-secret-1";
pub const DRIVER_USERNAME: &str = "driver1";
pub const DRIVER_PASSWORD: &str = "driver-secret-1";

pub struct MockEmailService {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, _html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((recipient.to_string(), subject.to_string()));
        Ok(())
    }
}

/// Scripted stand-in for the external booking service.
pub struct MockBookingApi {
    pub valid: bool,
    pub validation_message: String,
    pub registration_message: String,
    pub registration_success: bool,
    /// When set, every call errors, exercising the degraded paths.
    pub unreachable: bool,
}

impl Default for MockBookingApi {
    fn default() -> Self {
        Self {
            valid: true,
            validation_message: "Booking vigente".to_string(),
            registration_message: "Contenedor registrado".to_string(),
            registration_success: true,
            unreachable: false,
        }
    }
}

#[async_trait]
impl BookingApiClient for MockBookingApi {
    async fn validate_booking(&self, _booking_number: &str) -> Result<BookingValidation, AppError> {
        if self.unreachable {
            return Err(AppError::ExternalService("connection refused".into()));
        }
        Ok(BookingValidation {
            valid: self.valid,
            message: self.validation_message.clone(),
            data: None,
        })
    }

    async fn register_container(&self, _registration: &ContainerRegistration) -> Result<RegistrationOutcome, AppError> {
        if self.unreachable {
            return Err(AppError::ExternalService("connection refused".into()));
        }
        Ok(RegistrationOutcome {
            success: self.registration_success,
            message: self.registration_message.clone(),
        })
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<MockEmailService>,
    pub admin_id: String,
    pub driver_id: String,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_booking_api(Arc::new(MockBookingApi::default())).await
    }

    pub async fn with_booking_api(booking_api: Arc<dyn BookingApiClient>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "cancellation.html",
            "<html>Cancelada por {{ actor }}: {{ booking_number }}</html>",
        ).unwrap();
        let templates = Arc::new(tera);

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            timezone: "America/Guayaquil".to_string(),
            booking_api_url: "http://localhost".to_string(),
            booking_api_token: "token".to_string(),
            booking_validation_enabled: true,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            admin_notification_email: "operaciones@example.com".to_string(),
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
        };

        let timezone: chrono_tz::Tz = config.timezone.parse().unwrap();

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let email = Arc::new(MockEmailService::new());

        let admin = user_repo.create(&User::new(
            ADMIN_USERNAME.to_string(),
            "admin@example.com".to_string(),
            hash_password(ADMIN_PASSWORD),
            "Terminal Operations".to_string(),
            ROLE_ADMIN.to_string(),
        )).await.expect("Failed to seed admin");

        let driver = user_repo.create(&User::new(
            DRIVER_USERNAME.to_string(),
            "driver1@example.com".to_string(),
            hash_password(DRIVER_PASSWORD),
            "Transportes Andinos".to_string(),
            ROLE_USER.to_string(),
        )).await.expect("Failed to seed driver");

        let state = Arc::new(AppState {
            config: config.clone(),
            timezone,
            user_repo,
            auth_repo,
            schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
            block_repo: Arc::new(SqliteBlockRepo::new(pool.clone())),
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
            auth_service,
            email_service: email.clone(),
            booking_api,
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
            admin_id: admin.id,
            driver_id: driver.id,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "username": username,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders { access_token, csrf_token }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn login_driver(&self) -> AuthHeaders {
        self.login(DRIVER_USERNAME, DRIVER_PASSWORD).await
    }

    pub async fn get(&self, uri: &str, auth: &AuthHeaders) -> Response<Body> {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    pub async fn send_json(&self, method: &str, uri: &str, auth: &AuthHeaders, payload: Value) -> Response<Body> {
        self.router.clone().oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", auth.csrf_token.clone())
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn post(&self, uri: &str, auth: &AuthHeaders, payload: Value) -> Response<Body> {
        self.send_json("POST", uri, auth, payload).await
    }

    pub async fn put(&self, uri: &str, auth: &AuthHeaders, payload: Value) -> Response<Body> {
        self.send_json("PUT", uri, auth, payload).await
    }

    pub async fn delete(&self, uri: &str, auth: &AuthHeaders) -> Response<Body> {
        self.router.clone().oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", auth.csrf_token.clone())
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    /// Installs the standard Monday-Friday config used across tests:
    /// 08:00-17:00 every 30 minutes, capacity `slots_per_interval`.
    pub async fn seed_weekday_schedule(&self, slots_per_interval: i32) {
        let admin = self.login_admin().await;
        let entries: Vec<Value> = (1..=5)
            .map(|day| serde_json::json!({
                "day_of_week": day,
                "start_time": "08:00",
                "end_time": "17:00",
                "interval_minutes": 30,
                "slots_per_interval": slots_per_interval
            }))
            .collect();
        let response = self.put("/api/v1/admin/schedule", &admin, Value::Array(entries)).await;
        assert!(response.status().is_success(), "Failed to seed weekly schedule");
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
