use crate::domain::{
    models::blocked::{BlockedDate, BlockedSlot},
    ports::BlockRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresBlockRepo {
    pool: PgPool,
}

impl PostgresBlockRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for PostgresBlockRepo {
    async fn create_blocked_date(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            "INSERT INTO blocked_dates (id, date, reason, block_type, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&blocked.id).bind(blocked.date).bind(&blocked.reason).bind(&blocked.block_type)
            .bind(blocked.is_active).bind(blocked.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_blocked_dates(&self) -> Result<Vec<BlockedDate>, AppError> {
        sqlx::query_as::<_, BlockedDate>("SELECT * FROM blocked_dates ORDER BY date ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn active_blocked_dates(&self, date: NaiveDate) -> Result<Vec<BlockedDate>, AppError> {
        sqlx::query_as::<_, BlockedDate>("SELECT * FROM blocked_dates WHERE date = $1 AND is_active = TRUE")
            .bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete_blocked_date(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Blocked date not found".into())); }
        Ok(())
    }

    async fn create_blocked_slot(&self, blocked: &BlockedSlot) -> Result<BlockedSlot, AppError> {
        sqlx::query_as::<_, BlockedSlot>(
            "INSERT INTO blocked_slots (id, date, start_time, end_time, reason, is_recurring, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&blocked.id).bind(blocked.date).bind(blocked.start_time).bind(blocked.end_time)
            .bind(&blocked.reason).bind(blocked.is_recurring).bind(blocked.is_active).bind(blocked.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_blocked_slots(&self) -> Result<Vec<BlockedSlot>, AppError> {
        sqlx::query_as::<_, BlockedSlot>("SELECT * FROM blocked_slots ORDER BY start_time ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn blocked_slots_for_date(&self, date: NaiveDate) -> Result<Vec<BlockedSlot>, AppError> {
        sqlx::query_as::<_, BlockedSlot>(
            "SELECT * FROM blocked_slots WHERE is_active = TRUE AND (is_recurring = TRUE OR date = $1)"
        )
            .bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete_blocked_slot(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blocked_slots WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Blocked slot not found".into())); }
        Ok(())
    }
}
