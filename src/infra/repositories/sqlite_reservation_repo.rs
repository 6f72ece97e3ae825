use crate::domain::{
    models::reservation::{Reservation, EXPIRED_COMMENT},
    ports::ReservationRepository,
};
use crate::domain::services::lifecycle::SweepWindow;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn admit(&self, reservation: &Reservation, slot_capacity: i32) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Booking rule re-check under the transaction: two slots only when
        // the booking number already has a reservation.
        if reservation.slots_reserved == 2 {
            let prior: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE booking_number = ?")
                .bind(&reservation.booking_number)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            if prior == 0 {
                return Err(AppError::Conflict("booking_number: a new booking may reserve only one slot".to_string()));
            }
        }

        // Capacity re-check and insert in a single guarded statement; the
        // subquery is evaluated under the write lock so two concurrent
        // admissions for the last free slot cannot both pass.
        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, user_id, reservation_date, reservation_time, booking_number, transporter_name, truck_plate, slots_reserved, container_numbers, api_notes, status, cancelled_at, cancellation_comment, cancelled_by, completed_at, completed_by, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, NULL, NULL, NULL, ?
             WHERE (SELECT COALESCE(SUM(slots_reserved), 0) FROM reservations
                    WHERE reservation_date = ? AND reservation_time = ? AND status = 'ACTIVE') + ? <= ?
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.user_id)
            .bind(reservation.reservation_date).bind(reservation.reservation_time)
            .bind(&reservation.booking_number).bind(&reservation.transporter_name)
            .bind(&reservation.truck_plate).bind(reservation.slots_reserved)
            .bind(&reservation.container_numbers).bind(&reservation.api_notes)
            .bind(&reservation.status).bind(reservation.created_at)
            .bind(reservation.reservation_date).bind(reservation.reservation_time)
            .bind(reservation.slots_reserved).bind(slot_capacity)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::Conflict("reservation_time: slot capacity exceeded".to_string()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = ? ORDER BY reservation_date DESC, reservation_time DESC"
        )
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_all(&self) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations ORDER BY reservation_date DESC, reservation_time DESC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn reserved_by_time(&self, date: NaiveDate) -> Result<Vec<(NaiveTime, i64)>, AppError> {
        sqlx::query_as::<_, (NaiveTime, i64)>(
            "SELECT reservation_time, SUM(slots_reserved) FROM reservations
             WHERE reservation_date = ? AND status = 'ACTIVE'
             GROUP BY reservation_time"
        )
            .bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_by_booking_number(&self, booking_number: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE booking_number = ?")
            .bind(booking_number).fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str, cancelled_by: &str, comment: Option<String>) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations
             SET status = 'CANCELLED', cancelled_at = ?, cancellation_comment = ?, cancelled_by = ?
             WHERE id = ? AND status = 'ACTIVE'
             RETURNING *"
        )
            .bind(Utc::now()).bind(comment).bind(cancelled_by).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::Conflict("Reservation is not active".to_string()))
    }

    async fn complete_elapsed(&self, window: SweepWindow) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE reservations
             SET status = 'COMPLETED', completed_at = ?, completed_by = 'SYSTEM'
             WHERE status = 'ACTIVE'
               AND (reservation_date < ? OR (reservation_date = ? AND reservation_time < ?))
               AND NOT (reservation_date < ? OR (reservation_date = ? AND reservation_time < ?))"
        )
            .bind(Utc::now())
            .bind(window.today).bind(window.today).bind(window.now_time)
            .bind(window.expire_date_cutoff).bind(window.today).bind(window.expire_time_cutoff)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn expire_stale(&self, window: SweepWindow) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE reservations
             SET status = 'EXPIRED', cancelled_at = ?, cancellation_comment = ?, cancelled_by = 'SYSTEM'
             WHERE status = 'ACTIVE'
               AND (reservation_date < ? OR (reservation_date = ? AND reservation_time < ?))"
        )
            .bind(Utc::now()).bind(EXPIRED_COMMENT)
            .bind(window.expire_date_cutoff).bind(window.today).bind(window.expire_time_cutoff)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
