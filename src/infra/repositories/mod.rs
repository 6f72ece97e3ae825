pub mod postgres_auth_repo;
pub mod postgres_block_repo;
pub mod postgres_reservation_repo;
pub mod postgres_schedule_repo;
pub mod postgres_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_block_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_user_repo;
