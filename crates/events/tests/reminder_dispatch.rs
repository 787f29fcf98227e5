//! Integration tests for reminder dispatch: recurrence matching against the
//! bookings table, and the at-most-once-per-day delivery guarantee.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use atelier_db::models::booking::{BookingKind, BookingStatus, CreateBooking};
use atelier_db::repositories::BookingRepo;
use atelier_events::email::EmailError;
use atelier_events::reminders::{dispatch_for_date, Mailer};
use atelier_events::EventBus;

// ---------------------------------------------------------------------------
// Test mailers
// ---------------------------------------------------------------------------

/// Records every send instead of talking to SMTP.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    fn sent_to(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(to, _)| to.clone())
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), EmailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

/// Fails every send, simulating an SMTP outage.
struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), EmailError> {
        Err(EmailError::Build("smtp outage".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_booking(booking_date: &str, recurrence: Option<&str>) -> CreateBooking {
    CreateBooking {
        booking_date: date(booking_date),
        time_slots: vec!["10:00".to_string()],
        status: BookingStatus::Confirmed,
        kind: BookingKind::Client,
        contact_name: "Ada".to_string(),
        contact_email: Some("ada@example.com".to_string()),
        notes: None,
        recurrence: recurrence.map(|r| r.to_string()),
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// One-shot reminders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn one_shot_reminder_is_sent_exactly_once(pool: PgPool) {
    BookingRepo::create(&pool, &new_booking("2030-06-03", None))
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let bus = EventBus::default();
    let target = date("2030-06-03");

    let first = dispatch_for_date(&pool, &mailer, &bus, target).await.unwrap();
    assert_eq!(first.sent, 1);
    assert_eq!(first.failed, 0);

    // Second invocation for the same day: nothing new goes out.
    let second = dispatch_for_date(&pool, &mailer, &bus, target).await.unwrap();
    assert_eq!(second.sent, 0);

    assert_eq!(mailer.sent_to(), vec!["ada@example.com".to_string()]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_send_is_retried_on_the_next_run(pool: PgPool) {
    BookingRepo::create(&pool, &new_booking("2030-06-03", None))
        .await
        .unwrap();

    let bus = EventBus::default();
    let target = date("2030-06-03");

    // SMTP outage: nothing is marked as notified.
    let outage = dispatch_for_date(&pool, &FailingMailer, &bus, target)
        .await
        .unwrap();
    assert_eq!(outage.sent, 0);
    assert_eq!(outage.failed, 1);

    // Once SMTP is back, the same booking goes out.
    let mailer = RecordingMailer::default();
    let recovered = dispatch_for_date(&pool, &mailer, &bus, target).await.unwrap();
    assert_eq!(recovered.sent, 1);
}

// ---------------------------------------------------------------------------
// Recurring reminders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn weekly_reminder_fires_only_on_the_anchor_weekday(pool: PgPool) {
    // 2030-06-03 is a Monday.
    BookingRepo::create(&pool, &new_booking("2030-06-03", Some("weekly")))
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let bus = EventBus::default();

    // Tuesday: no match.
    let off_day = dispatch_for_date(&pool, &mailer, &bus, date("2030-06-11"))
        .await
        .unwrap();
    assert_eq!(off_day.sent, 0);

    // Next Monday: match.
    let on_day = dispatch_for_date(&pool, &mailer, &bus, date("2030-06-10"))
        .await
        .unwrap();
    assert_eq!(on_day.sent, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recurring_reminder_is_sent_once_per_occurrence(pool: PgPool) {
    BookingRepo::create(&pool, &new_booking("2030-06-03", Some("daily")))
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let bus = EventBus::default();

    let target = date("2030-06-20");
    let first = dispatch_for_date(&pool, &mailer, &bus, target).await.unwrap();
    assert_eq!(first.sent, 1);

    let again = dispatch_for_date(&pool, &mailer, &bus, target).await.unwrap();
    assert_eq!(again.sent, 0, "same-day re-run must not re-send");

    // The following day is a new occurrence.
    let next = dispatch_for_date(&pool, &mailer, &bus, date("2030-06-21"))
        .await
        .unwrap();
    assert_eq!(next.sent, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelled_and_unparseable_rules_send_nothing(pool: PgPool) {
    let cancelled = BookingRepo::create(&pool, &new_booking("2030-06-03", Some("daily")))
        .await
        .unwrap();
    BookingRepo::set_status(&pool, cancelled.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    BookingRepo::create(&pool, &new_booking("2030-06-03", Some("every-blue-moon")))
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let bus = EventBus::default();

    let summary = dispatch_for_date(&pool, &mailer, &bus, date("2030-06-10"))
        .await
        .unwrap();
    assert_eq!(summary.sent, 0);
    assert!(mailer.sent_to().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dispatch_publishes_reminder_events(pool: PgPool) {
    BookingRepo::create(&pool, &new_booking("2030-06-03", None))
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let bus = EventBus::default();
    let mut rx = bus.subscribe();

    dispatch_for_date(&pool, &mailer, &bus, date("2030-06-03"))
        .await
        .unwrap();

    let event = rx.try_recv().expect("a reminder.sent event must be published");
    assert_eq!(event.event_type, "reminder.sent");
    assert_eq!(event.source_entity_type.as_deref(), Some("booking"));
}
