//! Availability calculation for a single agenda date.
//!
//! Combines the weekday's availability template with the day's bookings to
//! derive the open 30-minute slots. Nothing here touches the database: the
//! caller loads the template row and the booked slot lists, converts the
//! server clock to studio-local time, and hands everything in.
//!
//! The "today" cutoff deliberately uses the server-authoritative clock, never
//! a client-supplied one.

use chrono::{NaiveDate, NaiveDateTime};

use crate::slots::{self, DisplayMode};

/// One bucket of a weekday template: a slot string and whether the studio
/// offers it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TemplateSlot {
    pub slot: String,
    pub active: bool,
}

/// A weekday's availability template as stored in `availability_templates`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DayTemplate {
    /// Whether the studio takes bookings on this weekday at all.
    pub is_active: bool,
    /// The day's 30-minute buckets.
    pub time_slots: Vec<TemplateSlot>,
}

impl DayTemplate {
    /// A template covering the full 48-bucket day with every slot active.
    pub fn fully_open() -> Self {
        Self {
            is_active: true,
            time_slots: slots::day_grid()
                .into_iter()
                .map(|slot| TemplateSlot { slot, active: true })
                .collect(),
        }
    }
}

/// Compute the open internal 30-minute slots for `date`.
///
/// * `template` — the weekday's template row; `None` (or an inactive row)
///   means the day is unavailable (fail-closed).
/// * `booked_slot_lists` — the `time_slots` of every non-cancelled booking on
///   `date`. A list equal to `["00:00"]` blocks the whole day.
/// * `now_local` — current studio-local date and time from the server clock;
///   when `date` is today, slots that have already started are dropped.
///
/// The result is sorted chronologically.
pub fn available_slots(
    date: NaiveDate,
    template: Option<&DayTemplate>,
    booked_slot_lists: &[Vec<String>],
    now_local: NaiveDateTime,
) -> Vec<String> {
    let Some(template) = template else {
        return Vec::new();
    };
    if !template.is_active {
        return Vec::new();
    }

    if booked_slot_lists
        .iter()
        .any(|list| slots::is_full_day_block(list))
    {
        return Vec::new();
    }

    let occupied: std::collections::HashSet<&str> = booked_slot_lists
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();

    let mut open: Vec<String> = template
        .time_slots
        .iter()
        .filter(|ts| ts.active && !occupied.contains(ts.slot.as_str()))
        .map(|ts| ts.slot.clone())
        .collect();

    if date == now_local.date() {
        let now_time = now_local.time();
        open.retain(|slot| match slots::parse_slot(slot) {
            Ok(start) => start > now_time,
            // A malformed persisted slot can never be offered.
            Err(_) => false,
        });
    }

    open.sort();
    open
}

/// Compute the slots a client may actually select, honouring the configured
/// display granularity. In one-hour mode only hours whose both halves are
/// open survive.
pub fn selectable_slots(
    date: NaiveDate,
    template: Option<&DayTemplate>,
    booked_slot_lists: &[Vec<String>],
    now_local: NaiveDateTime,
    mode: DisplayMode,
) -> Vec<String> {
    let open = available_slots(date, template, booked_slot_lists, now_local);
    slots::selectable_slots(&open, mode)
}

/// Whether `date` should be greyed out on the booking calendar: the studio
/// is open that weekday, but nothing is left to book.
pub fn is_fully_booked(
    date: NaiveDate,
    template: Option<&DayTemplate>,
    booked_slot_lists: &[Vec<String>],
    now_local: NaiveDateTime,
) -> bool {
    let open_day = template.map(|t| t.is_active).unwrap_or(false);
    open_day && available_slots(date, template, booked_slot_lists, now_local).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// A studio-local clock far in the past relative to the test dates, so
    /// the "today" cutoff never interferes unless a test wants it to.
    fn distant_past() -> NaiveDateTime {
        date("2000-01-01").and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
    }

    fn template(active_slots: &[&str]) -> DayTemplate {
        DayTemplate {
            is_active: true,
            time_slots: slots::day_grid()
                .into_iter()
                .map(|slot| {
                    let active = active_slots.contains(&slot.as_str());
                    TemplateSlot { slot, active }
                })
                .collect(),
        }
    }

    #[test]
    fn missing_template_means_no_slots() {
        let open = available_slots(date("2025-06-02"), None, &[], distant_past());
        assert!(open.is_empty());
    }

    #[test]
    fn inactive_template_means_no_slots() {
        let mut t = DayTemplate::fully_open();
        t.is_active = false;
        let open = available_slots(date("2025-06-02"), Some(&t), &[], distant_past());
        assert!(open.is_empty());
    }

    #[test]
    fn open_slots_are_template_minus_bookings() {
        let t = template(&["10:00", "10:30", "11:00"]);
        let booked = vec![vec!["10:30".to_string()]];
        let open = available_slots(date("2025-06-02"), Some(&t), &booked, distant_past());
        assert_eq!(open, vec!["10:00".to_string(), "11:00".to_string()]);
    }

    #[test]
    fn full_day_block_empties_the_day() {
        let t = DayTemplate::fully_open();
        let booked = vec![vec![slots::FULL_DAY_SLOT.to_string()]];
        let open = available_slots(date("2025-06-02"), Some(&t), &booked, distant_past());
        assert!(open.is_empty());
    }

    #[test]
    fn midnight_among_other_slots_is_not_a_full_day_block() {
        let t = template(&["00:00", "00:30", "10:00"]);
        let booked = vec![vec!["00:00".to_string(), "00:30".to_string()]];
        let open = available_slots(date("2025-06-02"), Some(&t), &booked, distant_past());
        assert_eq!(open, vec!["10:00".to_string()]);
    }

    #[test]
    fn today_drops_started_slots() {
        let t = template(&["09:00", "10:00", "11:00"]);
        // Studio-local clock: 10:00 exactly. The 10:00 slot has started.
        let now = date("2025-06-02").and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        let open = available_slots(date("2025-06-02"), Some(&t), &[], now);
        assert_eq!(open, vec!["11:00".to_string()]);
    }

    #[test]
    fn other_dates_ignore_the_clock() {
        let t = template(&["09:00"]);
        let now = date("2025-06-02").and_time(NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        let open = available_slots(date("2025-06-03"), Some(&t), &[], now);
        assert_eq!(open, vec!["09:00".to_string()]);
    }

    #[test]
    fn one_hour_mode_needs_both_halves_free() {
        let t = template(&["10:00", "10:30", "11:00"]);
        let open = selectable_slots(
            date("2025-06-02"),
            Some(&t),
            &[],
            distant_past(),
            DisplayMode::OneHour,
        );
        // 11:30 is inactive, so 11:00 cannot be offered as an hour.
        assert_eq!(open, vec!["10:00".to_string()]);
    }

    #[test]
    fn fully_booked_requires_an_open_weekday() {
        let t = template(&["10:00"]);
        let booked = vec![vec!["10:00".to_string()]];
        assert!(is_fully_booked(
            date("2025-06-02"),
            Some(&t),
            &booked,
            distant_past()
        ));
        // A closed weekday is "unavailable", not "fully booked".
        assert!(!is_fully_booked(date("2025-06-02"), None, &[], distant_past()));
        let mut closed = DayTemplate::fully_open();
        closed.is_active = false;
        assert!(!is_fully_booked(
            date("2025-06-02"),
            Some(&closed),
            &[],
            distant_past()
        ));
    }

    #[test]
    fn cancelled_bookings_are_callers_responsibility() {
        // The calculator sees only the lists it is given; the repository
        // filters cancelled bookings out before calling in.
        let t = template(&["10:00"]);
        let open = available_slots(date("2025-06-02"), Some(&t), &[], distant_past());
        assert_eq!(open, vec!["10:00".to_string()]);
    }
}
