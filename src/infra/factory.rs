use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use chrono_tz::Tz;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::models::user::{User, ROLE_ADMIN};
use crate::domain::ports::UserRepository;
use crate::domain::services::auth_service::AuthService;
use crate::state::AppState;
use crate::infra::booking_api::http_booking_api::HttpBookingApi;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_block_repo::PostgresBlockRepo,
    postgres_reservation_repo::PostgresReservationRepo, postgres_schedule_repo::PostgresScheduleRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_block_repo::SqliteBlockRepo,
    sqlite_reservation_repo::SqliteReservationRepo, sqlite_schedule_repo::SqliteScheduleRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let timezone: Tz = config.timezone.parse()
        .expect("TIMEZONE must be a valid IANA timezone name");

    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let booking_api = Arc::new(HttpBookingApi::new(
        config.booking_api_url.clone(),
        config.booking_api_token.clone(),
    ));

    let mut tera = Tera::default();
    tera.add_raw_template("cancellation.html", include_str!("../templates/cancellation.html"))
        .expect("Failed to load cancellation template");
    let templates = Arc::new(tera);

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        AppState {
            config: config.clone(),
            timezone,
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            schedule_repo: Arc::new(PostgresScheduleRepo::new(pool.clone())),
            block_repo: Arc::new(PostgresBlockRepo::new(pool.clone())),
            reservation_repo: Arc::new(PostgresReservationRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            email_service,
            booking_api,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        AppState {
            config: config.clone(),
            timezone,
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
            block_repo: Arc::new(SqliteBlockRepo::new(pool.clone())),
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            email_service,
            booking_api,
            templates,
        }
    };

    seed_admin(&state).await;
    state
}

/// First boot on an empty database gets an admin account from config so
/// the instance is administrable without manual SQL.
async fn seed_admin(state: &AppState) {
    let admins = state.user_repo.count_admins().await
        .expect("Failed to query admin count");
    if admins > 0 {
        return;
    }

    let password_hash = hash_password(&state.config.admin_password);
    let admin = User::new(
        state.config.admin_username.clone(),
        state.config.admin_notification_email.clone(),
        password_hash,
        "Terminal Operations".to_string(),
        ROLE_ADMIN.to_string(),
    );
    state.user_repo.create(&admin).await
        .expect("Failed to seed admin user");
    info!("Seeded initial admin user '{}'", admin.username);
}

pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Password hashing failed")
        .to_string()
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
