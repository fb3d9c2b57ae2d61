//! Month buckets and elapsed time calculations.

use time::{Date, Duration, Month, OffsetDateTime};

/// The first instant of the UTC calendar month containing the Unix timestamp `date`.
///
/// Returns `None` if `date` is outside the range of representable dates.
pub fn month_start(date: i64) -> Option<OffsetDateTime> {
    let first_day = OffsetDateTime::from_unix_timestamp(date)
        .ok()?
        .date()
        .replace_day(1)
        .ok()?;

    Some(first_day.midnight().assume_utc())
}

/// The key used to group transactions by month: the Unix timestamp of
/// [month_start] as a string.
pub fn month_key(date: i64) -> Option<String> {
    month_start(date).map(|start| start.unix_timestamp().to_string())
}

/// Shift `datetime` by `months` calendar months, keeping the time of day.
///
/// The day of the month is clamped to the length of the target month, e.g.
/// January 31st plus one month is the last day of February.
fn add_months(datetime: OffsetDateTime, months: i32) -> Option<OffsetDateTime> {
    let date = datetime.date();
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = month_index.div_euclid(12);
    let month = Month::try_from((month_index.rem_euclid(12) + 1) as u8).ok()?;

    let shifted = (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())?;

    Some(datetime.replace_date(shifted))
}

/// The fractional number of calendar months from `start` to `end`.
///
/// Whole months are counted on the calendar, and the remainder is the
/// fraction of the month that `end` falls into.
pub fn months_between(start: OffsetDateTime, end: OffsetDateTime) -> Option<f64> {
    let whole_months = (end.year() - start.year()) * 12 + i32::from(u8::from(end.month()))
        - i32::from(u8::from(start.month()));
    let anchor = add_months(start, whole_months)?;

    let adjustment = if end < anchor {
        let previous = add_months(start, whole_months - 1)?;
        (end - anchor) / (anchor - previous)
    } else {
        let next = add_months(start, whole_months + 1)?;
        (end - anchor) / (next - anchor)
    };

    Some(f64::from(whole_months) + adjustment)
}

/// The time between the earliest included transaction and the evaluation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elapsed {
    /// Fractional calendar months.
    pub months: f64,
    /// Fractional days.
    pub days: f64,
}

impl Elapsed {
    /// Measure the time from `earliest` to `now`.
    ///
    /// The span is clamped to at least one day so that averages for a brand new
    /// history stay finite.
    pub fn between(earliest: OffsetDateTime, now: OffsetDateTime) -> Option<Self> {
        let earliest = earliest.min(now - Duration::DAY);

        Some(Self {
            months: months_between(earliest, now)?,
            days: (now - earliest) / Duration::DAY,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{Elapsed, month_key, month_start, months_between};

    #[test]
    fn month_start_floors_to_first_of_month_utc() {
        let date = datetime!(2024-03-15 13:45 UTC).unix_timestamp();

        assert_eq!(month_start(date), Some(datetime!(2024-03-01 0:00 UTC)));
    }

    #[test]
    fn month_key_is_stringified_unix_timestamp() {
        let date = datetime!(2024-03-31 23:59:59 UTC).unix_timestamp();

        assert_eq!(month_key(date), Some("1709251200".to_owned()));
    }

    #[test]
    fn month_key_handles_dates_before_epoch() {
        let date = datetime!(1969-12-15 0:00 UTC).unix_timestamp();
        let expected = datetime!(1969-12-01 0:00 UTC).unix_timestamp().to_string();

        assert_eq!(month_key(date), Some(expected));
    }

    #[test]
    fn month_key_rejects_unrepresentable_dates() {
        assert_eq!(month_key(i64::MAX), None);
    }

    #[test]
    fn months_between_counts_whole_months() {
        let months = months_between(
            datetime!(2024-01-15 0:00 UTC),
            datetime!(2024-03-15 0:00 UTC),
        );

        assert_eq!(months, Some(2.0));
    }

    #[test]
    fn months_between_adds_fraction_of_current_month() {
        let months = months_between(
            datetime!(2024-01-01 0:00 UTC),
            datetime!(2024-01-16 0:00 UTC),
        )
        .unwrap();

        assert!((months - 15.0 / 31.0).abs() < 1e-12, "got {months}");
    }

    #[test]
    fn months_between_clamps_to_end_of_shorter_month() {
        let months = months_between(
            datetime!(2024-01-31 0:00 UTC),
            datetime!(2024-02-29 0:00 UTC),
        );

        assert_eq!(months, Some(1.0));
    }

    #[test]
    fn months_between_crosses_year_boundary() {
        let months = months_between(
            datetime!(2023-11-10 0:00 UTC),
            datetime!(2024-02-10 0:00 UTC),
        );

        assert_eq!(months, Some(3.0));
    }

    #[test]
    fn elapsed_is_clamped_to_one_day() {
        let now = datetime!(2024-05-10 12:00 UTC);

        let elapsed = Elapsed::between(now, now).unwrap();

        assert_eq!(elapsed.days, 1.0);
        assert!(elapsed.months > 0.0 && elapsed.months < 0.1);
    }

    #[test]
    fn elapsed_measures_days_and_months() {
        let elapsed = Elapsed::between(
            datetime!(2024-01-01 0:00 UTC),
            datetime!(2024-03-01 0:00 UTC),
        )
        .unwrap();

        assert_eq!(elapsed.days, 60.0);
        assert_eq!(elapsed.months, 2.0);
    }
}
