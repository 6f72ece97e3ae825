use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// IANA timezone of the facility. Every temporal rule (past-slot
    /// filtering, sweeps) runs on this clock.
    pub timezone: String,
    pub booking_api_url: String,
    pub booking_api_token: String,
    pub booking_validation_enabled: bool,
    pub mail_service_url: String,
    pub mail_service_token: String,
    /// Recipient for cancellation notices when the owner cancels.
    pub admin_notification_email: String,
    pub admin_username: String,
    pub admin_password: String,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            timezone: env::var("TIMEZONE").unwrap_or_else(|_| "America/Guayaquil".to_string()),
            booking_api_url: env::var("BOOKING_API_URL").unwrap_or_else(|_| "http://localhost:8100/api".to_string()),
            booking_api_token: env::var("BOOKING_API_TOKEN").unwrap_or_default(),
            booking_validation_enabled: env::var("BOOKING_VALIDATION_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            admin_notification_email: env::var("ADMIN_NOTIFICATION_EMAIL").unwrap_or_else(|_| "operaciones@dock.local".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.dock-reservations.local".to_string()),
        }
    }
}
