//! Bidirectional conversion between Gregorian instants and BS calendar
//! components.
//!
//! Both directions are stateless pure functions over the year table. All day
//! arithmetic is integer millisecond arithmetic; the wall-clock time of day is
//! carried around the date conversion unchanged, so it survives every BS⇄AD
//! round trip exactly.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::consts::{MAX_YEAR, MIN_YEAR, MONTHS_PER_YEAR, MS_PER_DAY, YEAR_OFFSET};
use crate::error::DateError;
use crate::table;

/// BS calendar components as `(year, month index, day index)`. Month and day
/// are zero-indexed; the day index may sit outside the month's real day range
/// when a caller has staged a sentinel value such as one-past-the-end.
pub(crate) type BsParts = (i32, usize, i32);

/// Converts a Gregorian instant to BS calendar components.
///
/// # Errors
/// Returns [`DateError::GregorianOutOfRange`] when the instant falls outside
/// the years covered by the table.
pub(crate) fn to_bs(instant: &DateTime<Utc>) -> Result<BsParts, DateError> {
    let time = instant.timestamp_millis();
    let gregorian = instant.year();
    let guess = gregorian + YEAR_OFFSET;

    if !(MIN_YEAR..=MAX_YEAR + 1).contains(&guess) {
        return Err(DateError::GregorianOutOfRange { gregorian, bs: guess });
    }

    // The +57 heuristic lands one year high for instants between 1 January
    // and the BS new year in mid-April, so walk backward until the candidate
    // year starts at or before the target instant.
    let mut year = guess.min(MAX_YEAR);
    let mapping = loop {
        if year < MIN_YEAR {
            return Err(DateError::GregorianOutOfRange { gregorian, bs: guess });
        }
        let mapping = table::lookup(year)?;
        if mapping.start_time() <= time {
            break mapping;
        }
        year -= 1;
    };

    let days = (time - mapping.start_time()) / MS_PER_DAY;
    let Some(month) = mapping.month_of_day(days) else {
        // Past the last day of the final supported year; reachable only when
        // the guess was clamped above.
        return Err(DateError::GregorianOutOfRange { gregorian, bs: guess });
    };
    let day = days - mapping.days_before_month(month);

    Ok((year, month, day as i32))
}

/// Converts BS calendar components to a Gregorian instant, overlaying the
/// wall-clock time of day taken from `time_of_day`.
///
/// # Errors
/// Returns [`DateError::YearOutOfRange`] when the BS year falls outside the
/// table and [`DateError::MonthOutOfRange`] for month indices past the last
/// month.
pub(crate) fn to_ad(parts: BsParts, time_of_day: &DateTime<Utc>) -> Result<DateTime<Utc>, DateError> {
    let (year, month, day) = parts;

    let mapping = table::lookup(year)?;
    if month >= MONTHS_PER_YEAR {
        return Err(DateError::MonthOutOfRange { month });
    }

    let days = mapping.days_before_month(month) + i64::from(day);
    let millis = mapping.start_time() + days * MS_PER_DAY + ms_of_day(time_of_day);

    DateTime::from_timestamp_millis(millis).ok_or(DateError::InvalidInstant { millis })
}

/// Milliseconds elapsed since midnight of the instant's UTC day.
pub(crate) fn ms_of_day(instant: &DateTime<Utc>) -> i64 {
    i64::from(instant.num_seconds_from_midnight()) * 1_000
        + i64::from(instant.timestamp_subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn midnight() -> DateTime<Utc> {
        DateTime::UNIX_EPOCH
    }

    #[test]
    fn epoch_instant_is_first_day_of_first_month() {
        let start = table::lookup(2000).unwrap().start_time();
        assert_eq!(to_bs(&instant(start)).unwrap(), (2000, 0, 0));
    }

    #[test]
    fn instant_before_epoch_is_rejected() {
        let start = table::lookup(2000).unwrap().start_time();
        let err = to_bs(&instant(start - 1)).unwrap_err();
        assert_eq!(
            err,
            DateError::GregorianOutOfRange {
                gregorian: 1943,
                bs: 2000
            }
        );
    }

    #[test]
    fn instant_in_prior_gregorian_year_is_rejected() {
        let june_1942 = Utc.with_ymd_and_hms(1942, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            to_bs(&june_1942).unwrap_err(),
            DateError::GregorianOutOfRange {
                gregorian: 1942,
                bs: 1999
            }
        );
    }

    #[test]
    fn instant_past_final_year_is_rejected() {
        let last = table::lookup(2099).unwrap();
        let end = last.start_time() + i64::from(last.days_in_year()) * MS_PER_DAY;

        // One day before the end still resolves; the end itself does not.
        assert_eq!(
            to_bs(&instant(end - MS_PER_DAY)).unwrap(),
            (2099, 11, i32::from(last.month_length(11)) - 1)
        );
        assert!(matches!(
            to_bs(&instant(end)).unwrap_err(),
            DateError::GregorianOutOfRange { .. }
        ));
    }

    #[test]
    fn far_future_guess_is_rejected_before_lookup() {
        let far_future = Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            to_bs(&far_future).unwrap_err(),
            DateError::GregorianOutOfRange {
                gregorian: 2050,
                bs: 2107
            }
        );
    }

    #[test]
    fn year_boundary_converts_to_adjacent_years() {
        let mapping = table::lookup(2050).unwrap();
        let start = mapping.start_time();
        let previous = table::lookup(2049).unwrap();

        assert_eq!(to_bs(&instant(start)).unwrap(), (2050, 0, 0));
        assert_eq!(
            to_bs(&instant(start - 1)).unwrap(),
            (2049, 11, i32::from(previous.month_length(11)) - 1)
        );
    }

    #[test]
    fn round_trips_every_day_of_sampled_years() {
        for year in [2000, 2042, 2081, 2099] {
            let mapping = table::lookup(year).unwrap();
            for month in 0..MONTHS_PER_YEAR {
                for day in 0..i32::from(mapping.month_length(month)) {
                    let ad = to_ad((year, month, day), &midnight()).unwrap();
                    assert_eq!(
                        to_bs(&ad).unwrap(),
                        (year, month, day),
                        "{year}-{month}-{day}"
                    );
                }
            }
        }
    }

    #[test]
    fn consecutive_days_are_exactly_one_day_apart() {
        let mapping = table::lookup(2042).unwrap();
        let mut previous = None;
        for month in 0..MONTHS_PER_YEAR {
            for day in 0..i32::from(mapping.month_length(month)) {
                let millis = to_ad((2042, month, day), &midnight())
                    .unwrap()
                    .timestamp_millis();
                if let Some(previous) = previous {
                    assert_eq!(millis - previous, MS_PER_DAY);
                }
                previous = Some(millis);
            }
        }
    }

    #[test]
    fn time_of_day_survives_conversion() {
        let donor = Utc.with_ymd_and_hms(1970, 6, 15, 13, 45, 30).unwrap()
            + chrono::Duration::milliseconds(123);
        let ad = to_ad((2042, 5, 9), &donor).unwrap();

        assert_eq!(ad.hour(), 13);
        assert_eq!(ad.minute(), 45);
        assert_eq!(ad.second(), 30);
        assert_eq!(ad.timestamp_subsec_millis(), 123);

        // The calendar date is unaffected by the donor's own date.
        assert_eq!(to_bs(&ad).unwrap(), (2042, 5, 9));
    }

    #[test]
    fn to_ad_rejects_years_outside_range() {
        assert_eq!(
            to_ad((1999, 0, 0), &midnight()).unwrap_err(),
            DateError::YearOutOfRange { year: 1999 }
        );
        assert_eq!(
            to_ad((2100, 0, 0), &midnight()).unwrap_err(),
            DateError::YearOutOfRange { year: 2100 }
        );
    }

    #[test]
    fn to_ad_rejects_month_indices_past_the_last_month() {
        assert_eq!(
            to_ad((2042, 12, 0), &midnight()).unwrap_err(),
            DateError::MonthOutOfRange { month: 12 }
        );
    }

    #[test]
    fn ms_of_day_counts_wall_clock_milliseconds() {
        assert_eq!(ms_of_day(&midnight()), 0);
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 1, 2, 3).unwrap()
            + chrono::Duration::milliseconds(4);
        assert_eq!(ms_of_day(&t), 3_723_004);
    }
}
