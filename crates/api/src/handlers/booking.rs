//! Handlers for the `/bookings` resource and the public availability lookup.
//!
//! The booking form on the marketing site drives `availability` and
//! `create`; everything else is the staff agenda. All slot arithmetic lives
//! in `atelier_core` -- these handlers load the inputs (template row, booked
//! slot lists, studio clock) and validate requests against the result.

use atelier_core::availability::{self, DayTemplate};
use atelier_core::error::CoreError;
use atelier_core::recurrence;
use atelier_core::slots::{self, DisplayMode};
use atelier_core::types::{weekday_index, DbId};
use atelier_db::models::booking::{Booking, BookingKind, BookingStatus, CreateBooking};
use atelier_db::repositories::{AvailabilityTemplateRepo, BookingRepo, StudioConfigRepo};
use atelier_events::PlatformEvent;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: NaiveDate,
}

/// One offerable slot in the configured display granularity.
#[derive(Debug, Serialize)]
pub struct SlotView {
    /// Internal start time, e.g. `"10:00"`.
    pub slot: String,
    /// User-facing range string, e.g. `"10:00 AM - 11:00 AM"`.
    pub label: String,
}

/// Response body for `GET /availability`.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    /// `"30min"` or `"1hour"`.
    pub display_mode: &'static str,
    pub allow_multiple_time_slots: bool,
    pub slots: Vec<SlotView>,
    /// The studio is open this weekday but nothing is left to book.
    pub fully_booked: bool,
}

/// Request body for the public `POST /bookings`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub booking_date: NaiveDate,
    /// Selected start times in the configured display granularity.
    pub time_slots: Vec<String>,
    #[validate(length(min = 1, max = 120))]
    pub contact_name: String,
    #[validate(email)]
    pub contact_email: String,
    pub notes: Option<String>,
}

/// Request body for the staff `POST /bookings/block`.
#[derive(Debug, Deserialize)]
pub struct CreateBlockRequest {
    pub booking_date: NaiveDate,
    /// Internal 30-minute slots to block; omit to block the whole day.
    pub time_slots: Option<Vec<String>>,
    pub notes: Option<String>,
    /// Recurrence keyword or custom-rule JSON for recurring reminders.
    pub recurrence: Option<String>,
}

/// Query parameters for `GET /bookings`.
#[derive(Debug, Deserialize)]
pub struct ListBookingsParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Request body for `PUT /bookings/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: BookingStatus,
}

// ---------------------------------------------------------------------------
// Agenda context
// ---------------------------------------------------------------------------

/// Studio settings resolved once per request: local clock, display
/// granularity, and the single-vs-multi slot rule.
struct AgendaContext {
    now_local: NaiveDateTime,
    display_mode: DisplayMode,
    allow_multiple: bool,
}

/// Load the studio configuration and convert the server clock to
/// studio-local time. The client clock is never consulted.
async fn agenda_context(state: &AppState) -> AppResult<AgendaContext> {
    let config = StudioConfigRepo::get(&state.pool).await?;
    let tz: Tz = config
        .timezone
        .parse()
        .unwrap_or(state.config.studio_timezone);
    Ok(AgendaContext {
        now_local: Utc::now().with_timezone(&tz).naive_local(),
        display_mode: DisplayMode::parse(&config.user_display_mode)?,
        allow_multiple: config.allow_multiple_time_slots,
    })
}

/// Load the weekday template and booked slot lists for `date`, returning
/// the open internal 30-minute slots.
async fn internal_availability(
    state: &AppState,
    date: NaiveDate,
    now_local: NaiveDateTime,
) -> AppResult<(Option<DayTemplate>, Vec<Vec<String>>, Vec<String>)> {
    let template = AvailabilityTemplateRepo::find_by_weekday(&state.pool, weekday_index(date.weekday()))
        .await?
        .map(|row| DayTemplate {
            is_active: row.is_active,
            time_slots: row.time_slots.0,
        });
    let booked = BookingRepo::occupied_slot_lists(&state.pool, date).await?;
    let open = availability::available_slots(date, template.as_ref(), &booked, now_local);
    Ok((template, booked, open))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/availability?date= (public)
pub async fn availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<AvailabilityResponse>> {
    let ctx = agenda_context(&state).await?;
    let (template, booked, open) =
        internal_availability(&state, params.date, ctx.now_local).await?;

    let slot_views = slots::selectable_slots(&open, ctx.display_mode)
        .into_iter()
        .map(|slot| {
            let label = slots::format_slot_range(&slot, ctx.display_mode)?;
            Ok(SlotView { slot, label })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let fully_booked =
        availability::is_fully_booked(params.date, template.as_ref(), &booked, ctx.now_local);

    Ok(Json(AvailabilityResponse {
        date: params.date,
        display_mode: ctx.display_mode.as_str(),
        allow_multiple_time_slots: ctx.allow_multiple,
        slots: slot_views,
        fully_booked,
    }))
}

/// POST /api/v1/bookings (public)
///
/// Create a client reservation. Selected slots are validated against the
/// current availability; in one-hour display mode each selection expands to
/// its two internal 30-minute slots before persisting.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if input.time_slots.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Select at least one time slot".into(),
        )));
    }

    let ctx = agenda_context(&state).await?;

    if !ctx.allow_multiple && input.time_slots.len() > 1 {
        return Err(AppError::Core(CoreError::Validation(
            "Only one time slot may be selected".into(),
        )));
    }

    let internal_slots = expand_selection(&input.time_slots, ctx.display_mode)?;

    // The bare sentinel is reserved for staff full-day blocks.
    if slots::is_full_day_block(&internal_slots) {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid slot selection".into(),
        )));
    }

    let (_, _, open) = internal_availability(&state, input.booking_date, ctx.now_local).await?;
    for slot in &internal_slots {
        if !open.contains(slot) {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Slot {slot} is no longer available"
            ))));
        }
    }

    let booking = BookingRepo::create(
        &state.pool,
        &CreateBooking {
            booking_date: input.booking_date,
            time_slots: internal_slots,
            status: BookingStatus::Pending,
            kind: BookingKind::Client,
            contact_name: input.contact_name,
            contact_email: Some(input.contact_email),
            notes: input.notes,
            recurrence: None,
            created_by: None,
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new("booking.created")
            .with_source("booking", booking.id)
            .with_payload(serde_json::json!({ "date": booking.booking_date })),
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

/// POST /api/v1/bookings/block (staff)
///
/// Take slots -- or the whole day, when `time_slots` is omitted -- off the
/// agenda.
pub async fn create_block(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBlockRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let time_slots = match input.time_slots {
        Some(list) if !list.is_empty() => {
            for slot in &list {
                slots::parse_slot(slot)?;
            }
            list
        }
        _ => vec![slots::FULL_DAY_SLOT.to_string()],
    };

    if let Some(rule) = input.recurrence.as_deref() {
        if !recurrence::is_valid_rule(rule) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown recurrence rule: {rule}"
            ))));
        }
    }

    let booking = BookingRepo::create(
        &state.pool,
        &CreateBooking {
            booking_date: input.booking_date,
            time_slots,
            status: BookingStatus::Confirmed,
            kind: BookingKind::AdminBlock,
            contact_name: "Studio block".to_string(),
            contact_email: None,
            notes: input.notes,
            recurrence: input.recurrence,
            created_by: Some(user.user_id),
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new("booking.blocked")
            .with_source("booking", booking.id)
            .with_actor(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/v1/bookings?from=&to= (staff)
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListBookingsParams>,
) -> AppResult<Json<Vec<Booking>>> {
    if params.from > params.to {
        return Err(AppError::BadRequest("from must not be after to".into()));
    }
    let bookings = BookingRepo::list_between(&state.pool, params.from, params.to).await?;
    Ok(Json(bookings))
}

/// GET /api/v1/bookings/{id} (staff)
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    Ok(Json(booking))
}

/// PUT /api/v1/bookings/{id}/status (staff)
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;

    state.event_bus.publish(
        PlatformEvent::new("booking.status_changed")
            .with_source("booking", id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({ "status": input.status })),
    );

    Ok(Json(booking))
}

/// DELETE /api/v1/bookings/{id} (staff)
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = BookingRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Expand display-granularity selections into internal 30-minute slots.
///
/// In one-hour mode each on-the-hour selection becomes its two half-hour
/// slots; in 30-minute mode selections pass through (validated for
/// alignment). Duplicates collapse.
fn expand_selection(selected: &[String], mode: DisplayMode) -> Result<Vec<String>, CoreError> {
    let mut internal = Vec::with_capacity(selected.len() * 2);
    for slot in selected {
        match mode {
            DisplayMode::ThirtyMinutes => {
                slots::parse_slot(slot)?;
                internal.push(slot.clone());
            }
            DisplayMode::OneHour => internal.extend(slots::expand_hour_slot(slot)?),
        }
    }
    internal.sort();
    internal.dedup();
    Ok(internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_selection_thirty_minutes_passes_through() {
        let out = expand_selection(
            &["10:00".to_string(), "10:30".to_string()],
            DisplayMode::ThirtyMinutes,
        )
        .unwrap();
        assert_eq!(out, vec!["10:00".to_string(), "10:30".to_string()]);
    }

    #[test]
    fn expand_selection_one_hour_expands_each_hour() {
        let out = expand_selection(&["10:00".to_string()], DisplayMode::OneHour).unwrap();
        assert_eq!(out, vec!["10:00".to_string(), "10:30".to_string()]);
    }

    #[test]
    fn expand_selection_rejects_half_hour_in_hour_mode() {
        assert!(expand_selection(&["10:30".to_string()], DisplayMode::OneHour).is_err());
    }

    #[test]
    fn expand_selection_rejects_misaligned() {
        assert!(expand_selection(&["10:15".to_string()], DisplayMode::ThirtyMinutes).is_err());
    }

    #[test]
    fn expand_selection_dedups_overlapping_hours() {
        let out = expand_selection(
            &["10:00".to_string(), "10:00".to_string()],
            DisplayMode::OneHour,
        )
        .unwrap();
        assert_eq!(out, vec!["10:00".to_string(), "10:30".to_string()]);
    }
}
