pub mod booking_api;
pub mod email;
pub mod factory;
pub mod repositories;
