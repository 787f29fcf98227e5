/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC; conversion to studio-local time happens at the
/// point of use via the configured [`chrono_tz::Tz`].
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Weekday index as persisted in `availability_templates.weekday`:
/// 0 = Sunday .. 6 = Saturday.
pub type WeekdayIndex = i16;

/// Convert a [`chrono::Weekday`] to the persisted 0=Sunday index.
pub fn weekday_index(weekday: chrono::Weekday) -> WeekdayIndex {
    weekday.num_days_from_sunday() as WeekdayIndex
}
