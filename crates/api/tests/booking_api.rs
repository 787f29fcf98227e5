//! Integration tests for bookings, availability, and reminder cron auth.
//!
//! The seed migration opens Monday-Friday 09:00-17:00 in 30-minute mode, so
//! a far-future Monday has the full 09:00..16:30 offering.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use common::{expect_json, request, TEST_CRON_SECRET};
use serde_json::json;
use sqlx::PgPool;

/// A Monday at least one week out, so "today" slot filtering never applies.
fn future_monday() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Days::new(7);
    while date.weekday() != Weekday::Mon {
        date = date + Days::new(1);
    }
    date
}

/// A Sunday at least one week out (inactive in the seed templates).
fn future_sunday() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Days::new(7);
    while date.weekday() != Weekday::Sun {
        date = date + Days::new(1);
    }
    date
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_lists_seeded_weekday_slots(pool: PgPool) {
    let app = common::build_test_app(pool);
    let date = future_monday();

    let response = request(app, "GET", &format!("/api/v1/availability?date={date}"), None, None)
        .await;
    let body = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["display_mode"], "30min");
    assert_eq!(body["fully_booked"], false);
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 16); // 09:00 .. 16:30
    assert_eq!(slots[0]["slot"], "09:00");
    assert_eq!(slots[0]["label"], "9:00 AM - 9:30 AM");
    assert_eq!(slots[15]["slot"], "16:30");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_is_empty_on_inactive_weekday(pool: PgPool) {
    let app = common::build_test_app(pool);
    let date = future_sunday();

    let response = request(app, "GET", &format!("/api/v1/availability?date={date}"), None, None)
        .await;
    let body = expect_json(response, StatusCode::OK).await;

    assert!(body["slots"].as_array().unwrap().is_empty());
    // A closed weekday is unavailable, not "fully booked".
    assert_eq!(body["fully_booked"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booked_slots_disappear_from_availability(pool: PgPool) {
    let date = future_monday();

    let app = common::build_test_app(pool.clone());
    let created = request(
        app,
        "POST",
        "/api/v1/bookings",
        None,
        Some(json!({
            "booking_date": date,
            "time_slots": ["10:00"],
            "contact_name": "Ada",
            "contact_email": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = request(app, "GET", &format!("/api/v1/availability?date={date}"), None, None)
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    let slots: Vec<&str> = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slot"].as_str().unwrap())
        .collect();
    assert!(!slots.contains(&"10:00"));
    assert!(slots.contains(&"10:30"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn full_day_block_empties_and_flags_the_day(pool: PgPool) {
    let date = future_monday();
    let staff_token = common::seed_staff(&pool).await;

    let app = common::build_test_app(pool.clone());
    let blocked = request(
        app,
        "POST",
        "/api/v1/bookings/block",
        Some(&staff_token),
        Some(json!({ "booking_date": date })),
    )
    .await;
    assert_eq!(blocked.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = request(app, "GET", &format!("/api/v1/availability?date={date}"), None, None)
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    assert!(body["slots"].as_array().unwrap().is_empty());
    assert_eq!(body["fully_booked"], true);
}

// ---------------------------------------------------------------------------
// Booking creation rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn double_booking_a_slot_conflicts(pool: PgPool) {
    let date = future_monday();
    let body = json!({
        "booking_date": date,
        "time_slots": ["11:00"],
        "contact_name": "Ada",
        "contact_email": "ada@example.com"
    });

    let app = common::build_test_app(pool.clone());
    let first = request(app, "POST", "/api/v1/bookings", None, Some(body.clone())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let second = request(app, "POST", "/api/v1/bookings", None, Some(body)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn multiple_slots_rejected_when_config_disallows(pool: PgPool) {
    // The seed config has allow_multiple_time_slots = false.
    let app = common::build_test_app(pool);
    let response = request(
        app,
        "POST",
        "/api/v1/bookings",
        None,
        Some(json!({
            "booking_date": future_monday(),
            "time_slots": ["10:00", "11:00"],
            "contact_name": "Ada",
            "contact_email": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn misaligned_slot_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = request(
        app,
        "POST",
        "/api/v1/bookings",
        None,
        Some(json!({
            "booking_date": future_monday(),
            "time_slots": ["10:15"],
            "contact_name": "Ada",
            "contact_email": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn closed_weekday_rejects_bookings(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = request(
        app,
        "POST",
        "/api/v1/bookings",
        None,
        Some(json!({
            "booking_date": future_sunday(),
            "time_slots": ["10:00"],
            "contact_name": "Ada",
            "contact_email": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Status changes and cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_a_booking_frees_its_slots(pool: PgPool) {
    let date = future_monday();
    let staff_token = common::seed_staff(&pool).await;

    let app = common::build_test_app(pool.clone());
    let created = request(
        app,
        "POST",
        "/api/v1/bookings",
        None,
        Some(json!({
            "booking_date": date,
            "time_slots": ["14:00"],
            "contact_name": "Ada",
            "contact_email": "ada@example.com"
        })),
    )
    .await;
    let created_body = expect_json(created, StatusCode::CREATED).await;
    let id = created_body["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let cancelled = request(
        app,
        "PUT",
        &format!("/api/v1/bookings/{id}/status"),
        Some(&staff_token),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(cancelled.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = request(app, "GET", &format!("/api/v1/availability?date={date}"), None, None)
        .await;
    let body = expect_json(response, StatusCode::OK).await;
    let slots: Vec<&str> = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slot"].as_str().unwrap())
        .collect();
    assert!(slots.contains(&"14:00"), "cancelled slot must be free again");
}

// ---------------------------------------------------------------------------
// Cron endpoint auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn cron_rejects_wrong_secret(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = request(
        app,
        "POST",
        "/api/v1/cron/reminders",
        Some("not-the-secret"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cron_without_smtp_is_unavailable(pool: PgPool) {
    // The correct secret gets past auth, but the test app has no mailer.
    let app = common::build_test_app(pool);
    let response = request(
        app,
        "POST",
        "/api/v1/cron/reminders",
        Some(TEST_CRON_SECRET),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
