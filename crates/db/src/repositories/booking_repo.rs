//! Repository for the `bookings` table.

use atelier_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::booking::{Booking, BookingStatus, CreateBooking};

const COLUMNS: &str = "id, booking_date, time_slots, status, kind, contact_name, contact_email, \
                       notes, recurrence, notified, last_notified_date, created_by, \
                       created_at, updated_at";

/// Provides CRUD and reminder-tracking operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings
                 (booking_date, time_slots, status, kind, contact_name, contact_email,
                  notes, recurrence, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.booking_date)
            .bind(&input.time_slots)
            .bind(input.status)
            .bind(input.kind)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.notes)
            .bind(&input.recurrence)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a booking by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List bookings within an inclusive date range, oldest first (agenda
    /// view).
    pub async fn list_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE booking_date BETWEEN $1 AND $2
             ORDER BY booking_date, created_at"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// The `time_slots` lists of every booking occupying `date` (anything
    /// not cancelled). Feeds the availability calculator.
    pub async fn occupied_slot_lists(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<Vec<String>>, sqlx::Error> {
        sqlx::query_scalar::<_, Vec<String>>(
            "SELECT time_slots FROM bookings
             WHERE booking_date = $1 AND status <> 'cancelled'",
        )
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Change a booking's status. Returns the updated row, or `None` if the
    /// booking does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $2 WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a booking. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Reminder dispatch ---------------------------------------------------

    /// One-shot reminder candidates for `date`: non-recurring, not cancelled,
    /// not yet notified, with a recipient address.
    pub async fn one_shot_reminder_candidates(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE recurrence IS NULL
               AND booking_date = $1
               AND status <> 'cancelled'
               AND NOT notified
               AND contact_email IS NOT NULL"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Recurring reminder candidates for `date`: every non-cancelled booking
    /// with a recurrence rule not already notified for that date. The actual
    /// rule matching happens in `atelier_core::recurrence`.
    pub async fn recurring_reminder_candidates(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE recurrence IS NOT NULL
               AND status <> 'cancelled'
               AND (last_notified_date IS NULL OR last_notified_date <> $1)
               AND contact_email IS NOT NULL"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Record that the one-shot reminder for this booking went out.
    pub async fn mark_notified(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE bookings SET notified = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record that a recurring reminder went out for `date`.
    pub async fn mark_notified_for_date(
        pool: &PgPool,
        id: DbId,
        date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE bookings SET last_notified_date = $2 WHERE id = $1")
            .bind(id)
            .bind(date)
            .execute(pool)
            .await?;
        Ok(())
    }
}
