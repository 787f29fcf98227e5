//! Booking-reminder dispatch.
//!
//! Reminders go out the day before a booking. A dispatch run computes
//! "tomorrow" in studio-local time, selects candidate bookings, matches
//! recurring ones via [`atelier_core::recurrence`], and sends one email per
//! match.
//!
//! Idempotency: one-shot bookings flip `notified`, recurring bookings record
//! `last_notified_date`, and both are marked only after a successful send.
//! Running dispatch twice for the same day therefore sends at most one email
//! per booking, and a failed send is retried on the next run.

use async_trait::async_trait;
use atelier_core::recurrence::matches_recurrence;
use atelier_core::slots::{self, DisplayMode};
use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use atelier_db::models::booking::Booking;
use atelier_db::repositories::{BookingRepo, StudioConfigRepo};
use atelier_db::DbPool;

use crate::bus::{EventBus, PlatformEvent};
use crate::email::{EmailDelivery, EmailError};

/// Anything that can carry a composed reminder to a recipient.
///
/// [`EmailDelivery`] is the production implementation; tests substitute a
/// collector.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

#[async_trait]
impl Mailer for EmailDelivery {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        EmailDelivery::send(self, to, subject, body).await
    }
}

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderRunSummary {
    /// The booking date reminders were dispatched for.
    pub target_date: NaiveDate,
    pub sent: u32,
    pub failed: u32,
}

/// Dispatch reminders for "tomorrow" in studio-local time.
///
/// The studio timezone comes from `studio_config`; an unparseable value
/// falls back to UTC with a warning rather than blocking reminders.
pub async fn dispatch_due_reminders(
    pool: &DbPool,
    mailer: &dyn Mailer,
    bus: &EventBus,
) -> Result<ReminderRunSummary, sqlx::Error> {
    let config = StudioConfigRepo::get(pool).await?;
    let tz: Tz = config.timezone.parse().unwrap_or_else(|_| {
        tracing::warn!(timezone = %config.timezone, "Invalid studio timezone, using UTC");
        chrono_tz::UTC
    });
    let tomorrow = Utc::now().with_timezone(&tz).date_naive() + Days::new(1);
    dispatch_for_date(pool, mailer, bus, tomorrow).await
}

/// Dispatch reminders for a specific booking date.
pub async fn dispatch_for_date(
    pool: &DbPool,
    mailer: &dyn Mailer,
    bus: &EventBus,
    target: NaiveDate,
) -> Result<ReminderRunSummary, sqlx::Error> {
    let mut summary = ReminderRunSummary {
        target_date: target,
        sent: 0,
        failed: 0,
    };

    for booking in BookingRepo::one_shot_reminder_candidates(pool, target).await? {
        if send_and_mark(pool, mailer, bus, &booking, target, false).await? {
            summary.sent += 1;
        } else {
            summary.failed += 1;
        }
    }

    for booking in BookingRepo::recurring_reminder_candidates(pool, target).await? {
        let rule = booking.recurrence.as_deref().unwrap_or_default();
        if !matches_recurrence(rule, booking.booking_date, target) {
            continue;
        }
        if send_and_mark(pool, mailer, bus, &booking, target, true).await? {
            summary.sent += 1;
        } else {
            summary.failed += 1;
        }
    }

    if summary.sent > 0 || summary.failed > 0 {
        tracing::info!(
            target_date = %summary.target_date,
            sent = summary.sent,
            failed = summary.failed,
            "Reminder dispatch finished"
        );
    }

    Ok(summary)
}

/// Send one reminder and record it. Returns `true` on success; a failed send
/// leaves the booking unmarked so the next run retries it.
async fn send_and_mark(
    pool: &DbPool,
    mailer: &dyn Mailer,
    bus: &EventBus,
    booking: &Booking,
    target: NaiveDate,
    recurring: bool,
) -> Result<bool, sqlx::Error> {
    // Candidate queries exclude address-less bookings.
    let Some(to) = booking.contact_email.as_deref() else {
        return Ok(false);
    };

    let subject = format!("Reminder: your booking on {}", target.format("%A %-d %B %Y"));
    let body = reminder_body(booking, target);

    if let Err(e) = mailer.send(to, &subject, &body).await {
        tracing::error!(booking_id = booking.id, error = %e, "Reminder send failed");
        return Ok(false);
    }

    if recurring {
        BookingRepo::mark_notified_for_date(pool, booking.id, target).await?;
    } else {
        BookingRepo::mark_notified(pool, booking.id).await?;
    }

    bus.publish(
        PlatformEvent::new("reminder.sent")
            .with_source("booking", booking.id)
            .with_payload(serde_json::json!({
                "target_date": target,
                "recurring": recurring,
            })),
    );

    Ok(true)
}

/// Compose the plain-text reminder body.
fn reminder_body(booking: &Booking, target: NaiveDate) -> String {
    let when = if slots::is_full_day_block(&booking.time_slots) {
        "all day".to_string()
    } else {
        // "HH:MM" strings sort chronologically; the rendered ranges do not.
        let mut sorted = booking.time_slots.clone();
        sorted.sort();
        sorted
            .iter()
            .filter_map(|slot| slots::format_slot_range(slot, DisplayMode::ThirtyMinutes).ok())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Hello {},\n\n\
         This is a reminder of your booking on {} ({}).\n\n\
         See you soon!",
        booking.contact_name,
        target.format("%A %-d %B %Y"),
        when
    )
}

/// How often the background loop checks for due reminders by default.
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;

/// Background service running [`dispatch_due_reminders`] on a fixed interval.
///
/// The dispatch itself is idempotent per day, so the hourly cadence only
/// bounds how late a reminder can be; the `/cron/reminders` endpoint triggers
/// the same dispatch on demand.
pub struct ReminderScheduler {
    pool: DbPool,
    mailer: Option<std::sync::Arc<EmailDelivery>>,
    bus: std::sync::Arc<EventBus>,
}

impl ReminderScheduler {
    /// Create a new scheduler. `mailer` is `None` when SMTP is not
    /// configured; the loop then only logs that reminders are disabled.
    pub fn new(
        pool: DbPool,
        mailer: Option<std::sync::Arc<EmailDelivery>>,
        bus: std::sync::Arc<EventBus>,
    ) -> Self {
        Self { pool, mailer, bus }
    }

    /// Run the reminder loop until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let interval_secs = std::env::var("REMINDER_CHECK_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS);
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        tracing::info!(interval_secs, "Reminder scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let Some(mailer) = &self.mailer else {
                        tracing::debug!("SMTP not configured; skipping reminder dispatch");
                        continue;
                    };
                    match dispatch_due_reminders(&self.pool, &**mailer, &self.bus).await {
                        Ok(summary) if summary.failed > 0 => {
                            tracing::warn!(
                                failed = summary.failed,
                                "Some reminders failed to send"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Reminder dispatch failed");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_db::models::booking::{BookingKind, BookingStatus};

    fn booking(slots: &[&str]) -> Booking {
        Booking {
            id: 1,
            booking_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            time_slots: slots.iter().map(|s| s.to_string()).collect(),
            status: BookingStatus::Confirmed,
            kind: BookingKind::Client,
            contact_name: "Ada".to_string(),
            contact_email: Some("ada@example.com".to_string()),
            notes: None,
            recurrence: None,
            notified: false,
            last_notified_date: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn body_mentions_slot_ranges() {
        let b = booking(&["10:00", "10:30"]);
        let body = reminder_body(&b, b.booking_date);
        assert!(body.contains("Hello Ada"));
        assert!(body.contains("10:00 AM - 10:30 AM"));
        assert!(body.contains("10:30 AM - 11:00 AM"));
        assert!(body.contains("Monday 2 June 2025"));
    }

    #[test]
    fn body_for_full_day_block_says_all_day() {
        let b = booking(&["00:00"]);
        let body = reminder_body(&b, b.booking_date);
        assert!(body.contains("all day"));
        assert!(!body.contains("12:00 AM"));
    }
}
