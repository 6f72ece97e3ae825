use crate::domain::{
    models::schedule::{ScheduleConfig, SpecialSchedule},
    ports::ScheduleRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteScheduleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepo {
    async fn upsert_weekly(&self, config: &ScheduleConfig) -> Result<ScheduleConfig, AppError> {
        sqlx::query_as::<_, ScheduleConfig>(
            "INSERT INTO schedule_configs (id, day_of_week, start_time, end_time, interval_minutes, slots_per_interval, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(day_of_week) DO UPDATE SET
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                interval_minutes = excluded.interval_minutes,
                slots_per_interval = excluded.slots_per_interval,
                is_active = excluded.is_active
             RETURNING *"
        )
            .bind(&config.id).bind(config.day_of_week).bind(config.start_time).bind(config.end_time)
            .bind(config.interval_minutes).bind(config.slots_per_interval).bind(config.is_active)
            .bind(config.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_weekly(&self, day_of_week: i32) -> Result<Option<ScheduleConfig>, AppError> {
        sqlx::query_as::<_, ScheduleConfig>("SELECT * FROM schedule_configs WHERE day_of_week = ?")
            .bind(day_of_week).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_weekly(&self) -> Result<Vec<ScheduleConfig>, AppError> {
        sqlx::query_as::<_, ScheduleConfig>("SELECT * FROM schedule_configs ORDER BY day_of_week ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert_special(
        &self,
        special: &SpecialSchedule,
        authorized_user_ids: &[String],
    ) -> Result<SpecialSchedule, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let saved = sqlx::query_as::<_, SpecialSchedule>(
            "INSERT INTO special_schedules (id, date, start_time, end_time, interval_minutes, slots_per_interval, is_active, restricted_access, description, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(date) DO UPDATE SET
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                interval_minutes = excluded.interval_minutes,
                slots_per_interval = excluded.slots_per_interval,
                is_active = excluded.is_active,
                restricted_access = excluded.restricted_access,
                description = excluded.description
             RETURNING *"
        )
            .bind(&special.id).bind(special.date).bind(special.start_time).bind(special.end_time)
            .bind(special.interval_minutes).bind(special.slots_per_interval).bind(special.is_active)
            .bind(special.restricted_access).bind(&special.description).bind(special.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM special_schedule_users WHERE special_schedule_id = ?")
            .bind(&saved.id).execute(&mut *tx).await.map_err(AppError::Database)?;
        for user_id in authorized_user_ids {
            sqlx::query("INSERT INTO special_schedule_users (special_schedule_id, user_id) VALUES (?, ?)")
                .bind(&saved.id).bind(user_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }
    async fn find_special_by_date(&self, date: NaiveDate) -> Result<Option<SpecialSchedule>, AppError> {
        sqlx::query_as::<_, SpecialSchedule>("SELECT * FROM special_schedules WHERE date = ?")
            .bind(date).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_specials(&self) -> Result<Vec<SpecialSchedule>, AppError> {
        sqlx::query_as::<_, SpecialSchedule>("SELECT * FROM special_schedules ORDER BY date ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_special_user_ids(&self, special_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar("SELECT user_id FROM special_schedule_users WHERE special_schedule_id = ?")
            .bind(special_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete_special(&self, date: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM special_schedules WHERE date = ?")
            .bind(date).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Special schedule not found".into())); }
        Ok(())
    }
}
