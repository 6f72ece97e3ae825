pub mod auth;
pub mod blocked;
pub mod reservation;
pub mod schedule;
pub mod user;
