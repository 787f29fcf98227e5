//! Time-slot primitives for the agenda.
//!
//! A slot is a fixed 30-minute bucket identified by its start time as a
//! zero-padded `"HH:MM"` string. That string form is what gets persisted;
//! the user-facing `"10:00 AM - 10:30 AM"` range strings are derived on read
//! and never stored.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Length of one internal slot.
pub const SLOT_MINUTES: u32 = 30;

/// Sentinel slot: a booking whose slot list is exactly `["00:00"]` blocks
/// the entire day.
pub const FULL_DAY_SLOT: &str = "00:00";

/// Slot presentation granularity, mirroring `studio_config.user_display_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Surface every 30-minute slot.
    #[serde(rename = "30min")]
    ThirtyMinutes,
    /// Surface only on-the-hour slots; each selection spans two internal slots.
    #[serde(rename = "1hour")]
    OneHour,
}

impl DisplayMode {
    /// The persisted string form (`"30min"` / `"1hour"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::ThirtyMinutes => "30min",
            DisplayMode::OneHour => "1hour",
        }
    }

    /// Parse the persisted string form. Unknown values fail closed to an error
    /// rather than guessing a granularity.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "30min" => Ok(DisplayMode::ThirtyMinutes),
            "1hour" => Ok(DisplayMode::OneHour),
            other => Err(CoreError::Validation(format!(
                "Unknown display mode: {other}"
            ))),
        }
    }

    /// Minutes covered by one user-facing selection in this mode.
    pub fn span_minutes(self) -> u32 {
        match self {
            DisplayMode::ThirtyMinutes => SLOT_MINUTES,
            DisplayMode::OneHour => 2 * SLOT_MINUTES,
        }
    }
}

/// Parse an `"HH:MM"` slot string, enforcing 30-minute alignment.
pub fn parse_slot(slot: &str) -> Result<NaiveTime, CoreError> {
    let time = NaiveTime::parse_from_str(slot, "%H:%M")
        .map_err(|_| CoreError::Validation(format!("Invalid slot format: {slot:?}")))?;
    if time.minute() % SLOT_MINUTES != 0 || time.second() != 0 {
        return Err(CoreError::Validation(format!(
            "Slot {slot:?} is not aligned to {SLOT_MINUTES} minutes"
        )));
    }
    Ok(time)
}

/// Render a time back into the canonical zero-padded slot string.
pub fn slot_string(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// The 48 slot strings of a full day, `"00:00"` through `"23:30"`.
pub fn day_grid() -> Vec<String> {
    (0..24)
        .flat_map(|hour| [format!("{hour:02}:00"), format!("{hour:02}:30")])
        .collect()
}

/// Whether a booking's slot list denotes a full-day block.
///
/// Only the exact list `["00:00"]` counts; a booking that merely *includes*
/// midnight among other slots occupies those slots normally.
pub fn is_full_day_block(slots: &[String]) -> bool {
    slots.len() == 1 && slots[0] == FULL_DAY_SLOT
}

/// Format a slot as the user-facing range string, e.g. `"10:00 AM - 10:30 AM"`
/// (or a one-hour span in [`DisplayMode::OneHour`]).
///
/// The end time wraps across midnight, so `"23:30"` renders as
/// `"11:30 PM - 12:00 AM"`.
pub fn format_slot_range(slot: &str, mode: DisplayMode) -> Result<String, CoreError> {
    let start = parse_slot(slot)?;
    let end = start + chrono::Duration::minutes(mode.span_minutes() as i64);
    Ok(format!(
        "{} - {}",
        start.format("%-I:%M %p"),
        end.format("%-I:%M %p")
    ))
}

/// Expand a user-selected one-hour slot into its two internal 30-minute slots.
///
/// Only on-the-hour starts are valid hour selections.
pub fn expand_hour_slot(slot: &str) -> Result<[String; 2], CoreError> {
    let start = parse_slot(slot)?;
    if start.minute() != 0 {
        return Err(CoreError::Validation(format!(
            "Hour slot must start on the hour, got {slot:?}"
        )));
    }
    let second = start + chrono::Duration::minutes(SLOT_MINUTES as i64);
    Ok([slot_string(start), slot_string(second)])
}

/// Collapse internal 30-minute slots into the slots a client may select in
/// the given display mode.
///
/// In 30-minute mode this is the identity. In one-hour mode only on-the-hour
/// slots whose second half-hour is also present survive.
pub fn selectable_slots(internal: &[String], mode: DisplayMode) -> Vec<String> {
    match mode {
        DisplayMode::ThirtyMinutes => internal.to_vec(),
        DisplayMode::OneHour => internal
            .iter()
            .filter(|slot| {
                let Ok(start) = parse_slot(slot) else {
                    return false;
                };
                if start.minute() != 0 {
                    return false;
                }
                let second = slot_string(start + chrono::Duration::minutes(SLOT_MINUTES as i64));
                internal.contains(&second)
            })
            .cloned()
            .collect(),
    }
}
