//! Booking entity model and DTOs (agenda).

use atelier_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Booking lifecycle status, stored as the Postgres enum `booking_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// What created the booking, stored as the Postgres enum `booking_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    /// A reservation submitted through the public booking form.
    Client,
    /// A block placed by staff to take slots (or the whole day) off the
    /// agenda.
    AdminBlock,
}

/// A booking row from the `bookings` table.
///
/// `time_slots` holds 30-minute-aligned `"HH:MM"` start times; the exact
/// list `["00:00"]` blocks the entire day. `recurrence` drives reminder
/// re-delivery only -- a recurring booking occupies slots solely on its
/// original date.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub booking_date: NaiveDate,
    pub time_slots: Vec<String>,
    pub status: BookingStatus,
    pub kind: BookingKind,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    /// Recurrence keyword or custom-rule JSON; `None` means one-shot.
    pub recurrence: Option<String>,
    /// One-shot reminder guard: set once the single reminder went out.
    pub notified: bool,
    /// Recurring reminder guard: the last date a reminder was sent for.
    pub last_notified_date: Option<NaiveDate>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub booking_date: NaiveDate,
    pub time_slots: Vec<String>,
    pub status: BookingStatus,
    pub kind: BookingKind,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub recurrence: Option<String>,
    pub created_by: Option<DbId>,
}
