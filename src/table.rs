//! Precomputed per-year calendar data.
//!
//! The table maps every supported BS year to the Gregorian instant its first
//! day begins at and to its per-month day counts. It is built once, process
//! wide, and never mutated afterwards; callers share one reference and may
//! read it concurrently without synchronization.

use std::sync::LazyLock;

use serde::Serialize;

use crate::consts::{BS_EPOCH_MS, MAX_YEAR, MIN_YEAR, MONTHS_PER_YEAR, MONTH_LENGTHS, MS_PER_DAY};
use crate::error::DateError;

/// Calendar data for a single BS year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearMapping {
    year: i32,
    start_time: i64,
    month_lengths: [u8; MONTHS_PER_YEAR],
    cumulative_days: [u16; MONTHS_PER_YEAR],
}

impl YearMapping {
    /// Returns the BS year this mapping describes.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the Gregorian instant (ms since the Unix epoch, UTC) at which
    /// day 1 of month 1 of this year begins.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Returns the day count of each month, first month at index 0.
    pub fn month_lengths(&self) -> &[u8; MONTHS_PER_YEAR] {
        &self.month_lengths
    }

    /// Returns the day count of the month at the given zero-based index.
    pub fn month_length(&self, month: usize) -> u8 {
        debug_assert!(month < MONTHS_PER_YEAR);
        self.month_lengths[month]
    }

    /// Returns the total day count of this year.
    pub fn days_in_year(&self) -> u16 {
        self.cumulative_days[MONTHS_PER_YEAR - 1]
    }

    /// Number of days elapsed from the start of the year to the start of the
    /// month at the given zero-based index.
    pub(crate) fn days_before_month(&self, month: usize) -> i64 {
        if month == 0 {
            0
        } else {
            i64::from(self.cumulative_days[month - 1])
        }
    }

    /// Locates the month a day-of-year offset falls into: the first index
    /// whose cumulative day count exceeds `days`. Returns `None` when the
    /// offset lies past the end of the year.
    pub(crate) fn month_of_day(&self, days: i64) -> Option<usize> {
        self.cumulative_days
            .iter()
            .position(|&cumulative| i64::from(cumulative) > days)
    }
}

static TABLE: LazyLock<Vec<YearMapping>> = LazyLock::new(|| {
    let mut start_time = BS_EPOCH_MS;
    MONTH_LENGTHS
        .iter()
        .enumerate()
        .map(|(index, lengths)| {
            let mut cumulative_days = [0u16; MONTHS_PER_YEAR];
            let mut total = 0u16;
            for (month, &length) in lengths.iter().enumerate() {
                total += u16::from(length);
                cumulative_days[month] = total;
            }
            let mapping = YearMapping {
                year: MIN_YEAR + index as i32,
                start_time,
                month_lengths: *lengths,
                cumulative_days,
            };
            start_time += i64::from(total) * MS_PER_DAY;
            mapping
        })
        .collect()
});

/// Looks up the calendar data for a BS year.
///
/// # Errors
/// Returns [`DateError::YearOutOfRange`] when `year` falls outside
/// `MIN_YEAR..=MAX_YEAR`.
pub fn lookup(year: i32) -> Result<&'static YearMapping, DateError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DateError::YearOutOfRange { year });
    }
    TABLE
        .get((year - MIN_YEAR) as usize)
        .ok_or(DateError::MissingYear { year })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_covers_every_supported_year() {
        for year in MIN_YEAR..=MAX_YEAR {
            let mapping = lookup(year).unwrap();
            assert_eq!(mapping.year(), year);
        }
    }

    #[test]
    fn lookup_rejects_years_outside_range() {
        assert_eq!(
            lookup(MIN_YEAR - 1).unwrap_err(),
            DateError::YearOutOfRange { year: 1999 }
        );
        assert_eq!(
            lookup(MAX_YEAR + 1).unwrap_err(),
            DateError::YearOutOfRange { year: 2100 }
        );
    }

    #[test]
    fn epoch_year_matches_anchor() {
        let mapping = lookup(MIN_YEAR).unwrap();
        assert_eq!(mapping.start_time(), BS_EPOCH_MS);
        assert_eq!(
            mapping.month_lengths(),
            &[30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31]
        );
        assert_eq!(mapping.days_in_year(), 365);
    }

    #[test]
    fn cumulative_days_strictly_increase_within_each_year() {
        for year in MIN_YEAR..=MAX_YEAR {
            let mapping = lookup(year).unwrap();
            let mut previous = 0i64;
            for month in 0..MONTHS_PER_YEAR {
                let before = mapping.days_before_month(month);
                assert_eq!(before, previous, "year {year} month {month}");
                previous = before + i64::from(mapping.month_length(month));
            }
            assert_eq!(previous, i64::from(mapping.days_in_year()));
        }
    }

    #[test]
    fn start_times_strictly_increase_with_year() {
        for year in MIN_YEAR..MAX_YEAR {
            let current = lookup(year).unwrap();
            let next = lookup(year + 1).unwrap();
            assert_eq!(
                next.start_time(),
                current.start_time() + i64::from(current.days_in_year()) * MS_PER_DAY
            );
        }
    }

    #[test]
    fn month_lengths_stay_within_calendar_bounds() {
        for year in MIN_YEAR..=MAX_YEAR {
            let mapping = lookup(year).unwrap();
            for &length in mapping.month_lengths() {
                assert!((29..=32).contains(&length), "year {year}");
            }
        }
    }

    #[test]
    fn month_of_day_resolves_boundaries() {
        let mapping = lookup(2042).unwrap();

        // First and last day of the first month.
        assert_eq!(mapping.month_of_day(0), Some(0));
        let first_length = i64::from(mapping.month_length(0));
        assert_eq!(mapping.month_of_day(first_length - 1), Some(0));
        // First day of the second month.
        assert_eq!(mapping.month_of_day(first_length), Some(1));
        // Last day of the year, then one past it.
        let total = i64::from(mapping.days_in_year());
        assert_eq!(mapping.month_of_day(total - 1), Some(MONTHS_PER_YEAR - 1));
        assert_eq!(mapping.month_of_day(total), None);
    }

    #[test]
    fn year_mapping_serializes() {
        let mapping = lookup(MIN_YEAR).unwrap();
        let json = serde_json::to_string(mapping).unwrap();
        assert!(json.contains("\"year\":2000"));
        assert!(json.contains("\"start_time\":-843177600000"));
    }
}
