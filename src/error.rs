//! Error type shared by the conversion engine and the date value.

use crate::consts::{MAX_YEAR, MIN_YEAR, MONTHS_PER_YEAR};

/// Error type for calendar conversions and date mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Returned when a Gregorian instant resolves to a BS year outside the
    /// supported table range.
    #[error("{gregorian} AD resolves to {bs} BS, outside the supported range ({}-{} BS)", MIN_YEAR, MAX_YEAR)]
    GregorianOutOfRange {
        /// Gregorian year of the instant that was given.
        gregorian: i32,
        /// BS year the instant resolved to.
        bs: i32,
    },

    /// Returned when a BS year outside the supported table range is requested.
    #[error("year {year} BS is outside the supported range ({}-{} BS)", MIN_YEAR, MAX_YEAR)]
    YearOutOfRange {
        /// The unsupported BS year that was requested.
        year: i32,
    },

    /// Returned when a month index outside `0..12` reaches the conversion
    /// engine.
    #[error("month index {month} is outside 0..{}", MONTHS_PER_YEAR)]
    MonthOutOfRange {
        /// The out-of-range month index.
        month: usize,
    },

    /// Returned when the year table has no entry for a year that passed range
    /// validation. Indicates corrupt table data, not bad input; unreachable in
    /// correct operation.
    #[error("no calendar data for year {year} BS despite passing range validation")]
    MissingYear {
        /// The year the table failed to resolve.
        year: i32,
    },

    /// Returned when a millisecond timestamp cannot be represented as an
    /// instant.
    #[error("timestamp {millis} ms is outside the representable instant range")]
    InvalidInstant {
        /// The unrepresentable millisecond timestamp.
        millis: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gregorian_out_of_range_display() {
        let err = DateError::GregorianOutOfRange {
            gregorian: 1920,
            bs: 1977,
        };
        assert_eq!(
            err.to_string(),
            "1920 AD resolves to 1977 BS, outside the supported range (2000-2099 BS)"
        );
    }

    #[test]
    fn year_out_of_range_display() {
        let err = DateError::YearOutOfRange { year: 2100 };
        assert_eq!(
            err.to_string(),
            "year 2100 BS is outside the supported range (2000-2099 BS)"
        );
    }

    #[test]
    fn month_out_of_range_display() {
        let err = DateError::MonthOutOfRange { month: 12 };
        assert_eq!(err.to_string(), "month index 12 is outside 0..12");
    }

    #[test]
    fn invalid_instant_display() {
        let err = DateError::InvalidInstant { millis: i64::MAX };
        assert_eq!(
            err.to_string(),
            format!("timestamp {} ms is outside the representable instant range", i64::MAX)
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<DateError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<DateError>();
    }
}
