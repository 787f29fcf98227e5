//! Integration tests for the booking repository, including the reminder
//! candidate queries and their idempotency marks.

use chrono::NaiveDate;
use sqlx::PgPool;

use atelier_db::models::booking::{BookingKind, BookingStatus, CreateBooking};
use atelier_db::repositories::BookingRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_booking(booking_date: &str, slots: &[&str]) -> CreateBooking {
    CreateBooking {
        booking_date: date(booking_date),
        time_slots: slots.iter().map(|s| s.to_string()).collect(),
        status: BookingStatus::Confirmed,
        kind: BookingKind::Client,
        contact_name: "Ada".to_string(),
        contact_email: Some("ada@example.com".to_string()),
        notes: None,
        recurrence: None,
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_round_trip(pool: PgPool) {
    let created = BookingRepo::create(&pool, &new_booking("2030-06-03", &["10:00", "10:30"]))
        .await
        .unwrap();

    let found = BookingRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("booking must exist");

    assert_eq!(found.booking_date, date("2030-06-03"));
    assert_eq!(found.time_slots, vec!["10:00", "10:30"]);
    assert_eq!(found.status, BookingStatus::Confirmed);
    assert_eq!(found.kind, BookingKind::Client);
    assert!(!found.notified);
    assert!(found.last_notified_date.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_between_is_inclusive_and_ordered(pool: PgPool) {
    for day in ["2030-06-02", "2030-06-04", "2030-06-08"] {
        BookingRepo::create(&pool, &new_booking(day, &["10:00"]))
            .await
            .unwrap();
    }

    let listed = BookingRepo::list_between(&pool, date("2030-06-02"), date("2030-06-04"))
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = listed.iter().map(|b| b.booking_date).collect();
    assert_eq!(dates, vec![date("2030-06-02"), date("2030-06-04")]);
}

#[sqlx::test(migrations = "./migrations")]
async fn occupied_slot_lists_exclude_cancelled(pool: PgPool) {
    let kept = BookingRepo::create(&pool, &new_booking("2030-06-03", &["10:00"]))
        .await
        .unwrap();
    let cancelled = BookingRepo::create(&pool, &new_booking("2030-06-03", &["11:00"]))
        .await
        .unwrap();
    BookingRepo::set_status(&pool, cancelled.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    // A different date must not leak in either.
    BookingRepo::create(&pool, &new_booking("2030-06-04", &["12:00"]))
        .await
        .unwrap();

    let occupied = BookingRepo::occupied_slot_lists(&pool, date("2030-06-03"))
        .await
        .unwrap();

    assert_eq!(occupied, vec![kept.time_slots]);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_the_row(pool: PgPool) {
    let created = BookingRepo::create(&pool, &new_booking("2030-06-03", &["10:00"]))
        .await
        .unwrap();

    assert!(BookingRepo::delete(&pool, created.id).await.unwrap());
    assert!(BookingRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(!BookingRepo::delete(&pool, created.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Reminder candidates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn one_shot_candidates_disappear_after_marking(pool: PgPool) {
    let booking = BookingRepo::create(&pool, &new_booking("2030-06-03", &["10:00"]))
        .await
        .unwrap();

    let due = BookingRepo::one_shot_reminder_candidates(&pool, date("2030-06-03"))
        .await
        .unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, booking.id);

    BookingRepo::mark_notified(&pool, booking.id).await.unwrap();

    let due = BookingRepo::one_shot_reminder_candidates(&pool, date("2030-06-03"))
        .await
        .unwrap();
    assert!(due.is_empty(), "a notified booking must not be re-sent");
}

#[sqlx::test(migrations = "./migrations")]
async fn one_shot_candidates_skip_cancelled_and_other_dates(pool: PgPool) {
    let cancelled = BookingRepo::create(&pool, &new_booking("2030-06-03", &["10:00"]))
        .await
        .unwrap();
    BookingRepo::set_status(&pool, cancelled.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    BookingRepo::create(&pool, &new_booking("2030-06-04", &["10:00"]))
        .await
        .unwrap();

    let due = BookingRepo::one_shot_reminder_candidates(&pool, date("2030-06-03"))
        .await
        .unwrap();
    assert!(due.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn recurring_candidates_respect_last_notified_date(pool: PgPool) {
    let mut input = new_booking("2030-06-03", &["10:00"]);
    input.recurrence = Some("weekly".to_string());
    let booking = BookingRepo::create(&pool, &input).await.unwrap();

    let target = date("2030-06-10");
    let due = BookingRepo::recurring_reminder_candidates(&pool, target)
        .await
        .unwrap();
    assert_eq!(due.len(), 1);

    BookingRepo::mark_notified_for_date(&pool, booking.id, target)
        .await
        .unwrap();

    // Already notified for this date: no longer a candidate.
    let due = BookingRepo::recurring_reminder_candidates(&pool, target)
        .await
        .unwrap();
    assert!(due.is_empty());

    // But the next occurrence is a fresh candidate again.
    let due = BookingRepo::recurring_reminder_candidates(&pool, date("2030-06-17"))
        .await
        .unwrap();
    assert_eq!(due.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn candidates_require_a_recipient_address(pool: PgPool) {
    let mut input = new_booking("2030-06-03", &["10:00"]);
    input.contact_email = None;
    BookingRepo::create(&pool, &input).await.unwrap();

    let due = BookingRepo::one_shot_reminder_candidates(&pool, date("2030-06-03"))
        .await
        .unwrap();
    assert!(due.is_empty());
}
