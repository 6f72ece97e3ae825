pub mod auth_service;
pub mod container;
pub mod lifecycle;
pub mod slots;
