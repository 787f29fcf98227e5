//! Recurrence matching for booking reminders.
//!
//! A booking's `recurrence` column is either a fixed keyword (`daily`,
//! `weekly`, `monthly`, `yearly`, `weekdays`) or a JSON document describing a
//! custom interval rule as produced by the admin recurrence editor:
//!
//! ```json
//! { "interval": 2, "unit": "week", "days": [1, 3],
//!   "endType": "count", "endCount": 10 }
//! ```
//!
//! [`matches_recurrence`] answers one question: given the booking's original
//! date, does the rule fire on `candidate`? Candidates before the original
//! date never match, and a rule that cannot be parsed matches nothing
//! (fail-closed — better a missed reminder than an unbounded stream of them).

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Deserialize;

/// Unit of a custom recurrence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

/// Termination condition of a custom recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndType {
    #[default]
    Never,
    Date,
    Count,
}

/// A custom recurrence rule, deserialized from the JSON stored in
/// `bookings.recurrence`. Field names are camelCase on the wire because the
/// admin UI produces them that way.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecurrence {
    /// Every N units. Zero is treated as 1.
    pub interval: u32,
    pub unit: RecurrenceUnit,
    /// Weekday filter for weekly rules, 0 = Sunday .. 6 = Saturday.
    /// Empty means "same weekday as the original date".
    #[serde(default)]
    pub days: Vec<u8>,
    #[serde(default)]
    pub end_type: EndType,
    /// Last date the rule may fire (inclusive) when `end_type` is `date`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Maximum number of occurrences when `end_type` is `count`.
    #[serde(default)]
    pub end_count: Option<u32>,
}

/// Does `rule` fire on `candidate`, given the booking's original date?
pub fn matches_recurrence(rule: &str, original: NaiveDate, candidate: NaiveDate) -> bool {
    if candidate < original {
        return false;
    }

    match rule.trim() {
        "" | "none" => false,
        "daily" => true,
        "weekly" => candidate.weekday() == original.weekday(),
        "monthly" => {
            // Same weekday AND same Nth-occurrence-of-that-weekday index,
            // so "second Tuesday" stays the second Tuesday.
            candidate.weekday() == original.weekday()
                && weekday_ordinal_in_month(candidate) == weekday_ordinal_in_month(original)
        }
        "yearly" => {
            candidate.month() == original.month() && candidate.day() == original.day()
        }
        "weekdays" => !matches!(candidate.weekday(), Weekday::Sat | Weekday::Sun),
        custom => match serde_json::from_str::<CustomRecurrence>(custom) {
            Ok(rule) => rule.matches(original, candidate),
            Err(_) => false,
        },
    }
}

/// Whether `rule` is one the matcher understands: a known keyword or a
/// parseable custom JSON rule. Used to reject typos at write time instead of
/// silently never firing.
pub fn is_valid_rule(rule: &str) -> bool {
    match rule.trim() {
        "" | "none" | "daily" | "weekly" | "monthly" | "yearly" | "weekdays" => true,
        custom => serde_json::from_str::<CustomRecurrence>(custom).is_ok(),
    }
}

/// Which occurrence of its weekday within the month a date is (0-based:
/// the first Tuesday is 0, the second is 1, ...).
fn weekday_ordinal_in_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7
}

impl CustomRecurrence {
    /// Evaluate the rule against a candidate date.
    pub fn matches(&self, original: NaiveDate, candidate: NaiveDate) -> bool {
        if candidate < original {
            return false;
        }
        if !self.base_matches(original, candidate) {
            return false;
        }
        match self.end_type {
            EndType::Never => true,
            // A date-bounded rule without a date (or count-bounded without a
            // count) is malformed; fail closed.
            EndType::Date => self.end_date.is_some_and(|end| candidate <= end),
            EndType::Count => self
                .end_count
                .is_some_and(|max| self.occurrence_number(original, candidate) <= max),
        }
    }

    /// Interval arithmetic from the original date, ignoring the end condition.
    fn base_matches(&self, original: NaiveDate, candidate: NaiveDate) -> bool {
        let interval = i64::from(self.interval.max(1));
        let diff_days = (candidate - original).num_days();

        match self.unit {
            RecurrenceUnit::Day => diff_days % interval == 0,
            RecurrenceUnit::Week => {
                (diff_days / 7) % interval == 0 && self.weekday_selected(original, candidate)
            }
            RecurrenceUnit::Month => {
                months_between(original, candidate) % interval == 0
                    && candidate.day() == original.day()
            }
            RecurrenceUnit::Year => {
                i64::from(candidate.year() - original.year()) % interval == 0
                    && candidate.month() == original.month()
                    && candidate.day() == original.day()
            }
        }
    }

    /// Weekday filter for weekly rules. An empty `days` list means the rule
    /// inherits the original date's weekday.
    fn weekday_selected(&self, original: NaiveDate, candidate: NaiveDate) -> bool {
        if self.days.is_empty() {
            candidate.weekday() == original.weekday()
        } else {
            let day = candidate.weekday().num_days_from_sunday() as u8;
            self.days.contains(&day)
        }
    }

    /// 1-based index of `candidate` among the rule's occurrences starting at
    /// `original`. Only meaningful when `base_matches` holds for `candidate`.
    ///
    /// Counts actual occurrences rather than assuming one per interval step:
    /// monthly rules skip months lacking the anchor day (Jan 31 -> February),
    /// yearly rules skip non-leap Feb 29, and weekly rules may fire several
    /// times per week.
    fn occurrence_number(&self, original: NaiveDate, candidate: NaiveDate) -> u32 {
        let interval = i64::from(self.interval.max(1));
        let diff_days = (candidate - original).num_days();

        match self.unit {
            RecurrenceUnit::Day => (diff_days / interval) as u32 + 1,
            RecurrenceUnit::Week => {
                let mut count = 0u32;
                let mut week = 0i64;
                while week * 7 <= diff_days {
                    let block_start = original + Days::new((week * 7) as u64);
                    for offset in 0..7u64 {
                        let day = block_start + Days::new(offset);
                        if day < original || day > candidate {
                            continue;
                        }
                        if self.weekday_selected(original, day) {
                            count += 1;
                        }
                    }
                    week += interval;
                }
                count
            }
            RecurrenceUnit::Month => {
                let steps = months_between(original, candidate) / interval;
                let mut count = 0u32;
                for step in 0..=steps {
                    if add_months(original, step * interval)
                        .is_some_and(|d| d.day() == original.day())
                    {
                        count += 1;
                    }
                }
                count
            }
            RecurrenceUnit::Year => {
                let steps = i64::from(candidate.year() - original.year()) / interval;
                let mut count = 0u32;
                for step in 0..=steps {
                    let year = original.year() + (step * interval) as i32;
                    if NaiveDate::from_ymd_opt(year, original.month(), original.day()).is_some() {
                        count += 1;
                    }
                }
                count
            }
        }
    }
}

/// Whole calendar months from `a` to `b` (ignores the day component).
fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    i64::from(b.year() - a.year()) * 12 + i64::from(b.month() as i32 - a.month() as i32)
}

/// `date` shifted forward by `months` calendar months, or `None` when the
/// target month has no such day.
fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let zero_based = i64::from(date.year()) * 12 + i64::from(date.month0());
    let target = zero_based + months;
    let year = i32::try_from(target.div_euclid(12)).ok()?;
    let month = (target.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, date.day())
}
