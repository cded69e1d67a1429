mod consts;
mod convert;
mod error;
mod format;
mod prelude;
mod table;

pub use consts::*;
pub use error::DateError;
pub use table::{YearMapping, lookup};

use crate::prelude::*;
use chrono::{DateTime, Datelike, Offset, Timelike, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A Bikram Sambat calendar date with full time-of-day precision.
///
/// The value holds two synchronized representations of the same instant: a
/// Gregorian `DateTime<Utc>` and a BS `(year, month, day)` component triple.
/// Every constructor and mutator runs one of the two conversion directions, so
/// the representations can never drift apart; a mutator that fails leaves the
/// value untouched.
///
/// The accessor surface mirrors the host-platform `Date` convention it was
/// built against: [`month`](Self::month) is zero-indexed while
/// [`date`](Self::date) is one-indexed, and [`day`](Self::day) is the
/// Gregorian weekday. Staged sentinel values (see
/// [`end_of_month`](Self::end_of_month)) are reported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NepaliDate {
    gregorian: DateTime<Utc>,
    /// `(year, month index, day index)`; month and day zero-indexed.
    bs: (i32, usize, i32),
}

/// Error type for constructing a [`NepaliDate`] from strings or BS components.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MONTHS_PER_YEAR)]
    InvalidMonth(u32),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "{_0}")]
    Conversion(DateError),
}

impl std::error::Error for ParseError {}

impl From<DateError> for ParseError {
    fn from(err: DateError) -> Self {
        Self::Conversion(err)
    }
}

impl NepaliDate {
    /// First supported BS year (inclusive)
    pub const MIN_YEAR: i32 = consts::MIN_YEAR;
    /// Last supported BS year (inclusive)
    pub const MAX_YEAR: i32 = consts::MAX_YEAR;

    /// Creates a date holding the current instant.
    ///
    /// # Errors
    /// Returns [`DateError::GregorianOutOfRange`] once the wall clock leaves
    /// the supported year range.
    pub fn now() -> Result<Self, DateError> {
        Self::from_gregorian(Utc::now())
    }

    /// Creates a date from a Gregorian instant.
    ///
    /// # Errors
    /// Returns [`DateError::GregorianOutOfRange`] when the instant falls
    /// outside the supported year range.
    pub fn from_gregorian(instant: DateTime<Utc>) -> Result<Self, DateError> {
        let bs = convert::to_bs(&instant)?;
        Ok(Self { gregorian: instant, bs })
    }

    /// Creates a date from milliseconds since the Unix epoch, UTC.
    ///
    /// # Errors
    /// Returns [`DateError::InvalidInstant`] for unrepresentable timestamps
    /// and [`DateError::GregorianOutOfRange`] for instants outside the
    /// supported year range.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, DateError> {
        let instant = DateTime::from_timestamp_millis(millis)
            .ok_or(DateError::InvalidInstant { millis })?;
        Self::from_gregorian(instant)
    }

    /// Creates a date from one-indexed BS components, at midnight UTC.
    ///
    /// Unlike the staged values mutators accept, all three components are
    /// validated against the year table here.
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidYear`], [`ParseError::InvalidMonth`] or
    /// [`ParseError::InvalidDay`] when a component falls outside its valid
    /// range.
    pub fn from_bs(year: i32, month: u32, day: u32) -> Result<Self, ParseError> {
        let mapping = table::lookup(year).map_err(|_| ParseError::InvalidYear(year))?;
        if !(1..=MONTHS_PER_YEAR as u32).contains(&month) {
            return Err(ParseError::InvalidMonth(month));
        }
        let max_day = u32::from(mapping.month_length(month as usize - 1));
        if !(1..=max_day).contains(&day) {
            return Err(ParseError::InvalidDay { year, month, day });
        }

        let bs = (year, month as usize - 1, day as i32 - 1);
        let gregorian = convert::to_ad(bs, &DateTime::UNIX_EPOCH)?;
        Ok(Self { gregorian, bs })
    }

    /// Returns the BS day of the month, 1-indexed.
    pub fn date(&self) -> i32 {
        self.bs.2 + 1
    }

    /// Returns the BS month, **0-indexed** (first month is 0).
    ///
    /// The zero-indexed month next to the one-indexed [`date`](Self::date) is
    /// deliberate: it mirrors the `Date` convention this API imitates.
    pub fn month(&self) -> u32 {
        self.bs.1 as u32
    }

    /// Returns the BS year.
    pub fn full_year(&self) -> i32 {
        self.bs.0
    }

    /// Returns the Gregorian weekday index, 0 (Sunday) through 6 (Saturday).
    pub fn day(&self) -> u32 {
        self.gregorian.weekday().num_days_from_sunday()
    }

    /// Returns the hour of day; time of day is calendar-invariant.
    pub fn hours(&self) -> u32 {
        self.gregorian.hour()
    }

    /// Returns the minute of the hour.
    pub fn minutes(&self) -> u32 {
        self.gregorian.minute()
    }

    /// Returns the second of the minute.
    pub fn seconds(&self) -> u32 {
        self.gregorian.second()
    }

    /// Returns the millisecond of the second.
    pub fn milliseconds(&self) -> u32 {
        self.gregorian.timestamp_subsec_millis()
    }

    /// Returns milliseconds since the Unix epoch, UTC.
    pub fn time(&self) -> i64 {
        self.gregorian.timestamp_millis()
    }

    /// Returns the offset of the backing representation in minutes behind
    /// UTC; always 0 for the UTC-backed value.
    pub fn timezone_offset(&self) -> i32 {
        -self.gregorian.offset().fix().local_minus_utc() / 60
    }

    /// Returns the Gregorian representation of this date.
    pub fn to_gregorian(&self) -> DateTime<Utc> {
        self.gregorian
    }

    /// Sets the BS day of the month (1-indexed) and re-derives the Gregorian
    /// field. The day is stored as given, without normalization, so values
    /// past the end of the month stage a sentinel that still denotes a valid
    /// instant in the following month.
    ///
    /// Returns the resulting instant in milliseconds.
    ///
    /// # Errors
    /// Returns [`DateError::YearOutOfRange`] when the current year has no
    /// table entry for the re-derivation.
    pub fn set_date(&mut self, day: i32) -> Result<i64, DateError> {
        self.commit_bs((self.bs.0, self.bs.1, day - 1))
    }

    /// Sets the BS year and optionally the month and day, then re-derives the
    /// Gregorian field. `month` and `day` are **raw zero-based indices**
    /// (unlike [`set_date`](Self::set_date)); omitted components keep their
    /// current values.
    ///
    /// Returns the resulting instant in milliseconds.
    ///
    /// # Errors
    /// Returns [`DateError::YearOutOfRange`] or
    /// [`DateError::MonthOutOfRange`] when the staged components cannot be
    /// resolved against the table.
    pub fn set_full_year(
        &mut self,
        year: i32,
        month: Option<u32>,
        day: Option<i32>,
    ) -> Result<i64, DateError> {
        let month = month.map_or(self.bs.1, |month| month as usize);
        let day = day.unwrap_or(self.bs.2);
        self.commit_bs((year, month, day))
    }

    /// Sets the BS month as a month count relative to the first supported
    /// year, so values outside `0..12` roll into adjacent years the way
    /// `Date`-style month arithmetic does: month 12 of year Y is month 0 of
    /// year Y+1, month −1 of year Y is month 11 of year Y−1. `day` is a raw
    /// zero-based index; omitted, the current day is kept.
    ///
    /// Returns the resulting instant in milliseconds.
    ///
    /// # Errors
    /// Returns [`DateError::YearOutOfRange`] when the rollover leaves the
    /// supported year range.
    pub fn set_month(&mut self, month: i32, day: Option<i32>) -> Result<i64, DateError> {
        let absolute = (self.bs.0 - MIN_YEAR) * MONTHS_PER_YEAR as i32 + month;
        let year = MIN_YEAR + absolute.div_euclid(MONTHS_PER_YEAR as i32);
        let month = absolute.rem_euclid(MONTHS_PER_YEAR as i32) as usize;
        let day = day.unwrap_or(self.bs.2);
        self.commit_bs((year, month, day))
    }

    /// Sets the wall-clock hour and optionally the smaller components, then
    /// re-derives the BS triple. Out-of-range components roll across
    /// midnight; omitted components keep their current values.
    ///
    /// Returns the resulting instant in milliseconds.
    ///
    /// # Errors
    /// Returns [`DateError::GregorianOutOfRange`] when the rolled instant
    /// leaves the supported year range.
    pub fn set_hours(
        &mut self,
        hours: i64,
        minutes: Option<i64>,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
    ) -> Result<i64, DateError> {
        let instant = self.with_time_of_day(
            hours,
            minutes.unwrap_or_else(|| self.minutes().into()),
            seconds.unwrap_or_else(|| self.seconds().into()),
            milliseconds.unwrap_or_else(|| self.milliseconds().into()),
        )?;
        self.commit_gregorian(instant)
    }

    /// Sets the wall-clock minute and optionally the smaller components.
    ///
    /// # Errors
    /// See [`set_hours`](Self::set_hours).
    pub fn set_minutes(
        &mut self,
        minutes: i64,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
    ) -> Result<i64, DateError> {
        let instant = self.with_time_of_day(
            self.hours().into(),
            minutes,
            seconds.unwrap_or_else(|| self.seconds().into()),
            milliseconds.unwrap_or_else(|| self.milliseconds().into()),
        )?;
        self.commit_gregorian(instant)
    }

    /// Sets the wall-clock second and optionally the millisecond.
    ///
    /// # Errors
    /// See [`set_hours`](Self::set_hours).
    pub fn set_seconds(&mut self, seconds: i64, milliseconds: Option<i64>) -> Result<i64, DateError> {
        let instant = self.with_time_of_day(
            self.hours().into(),
            self.minutes().into(),
            seconds,
            milliseconds.unwrap_or_else(|| self.milliseconds().into()),
        )?;
        self.commit_gregorian(instant)
    }

    /// Sets the wall-clock millisecond.
    ///
    /// # Errors
    /// See [`set_hours`](Self::set_hours).
    pub fn set_milliseconds(&mut self, milliseconds: i64) -> Result<i64, DateError> {
        let instant = self.with_time_of_day(
            self.hours().into(),
            self.minutes().into(),
            self.seconds().into(),
            milliseconds,
        )?;
        self.commit_gregorian(instant)
    }

    /// Replaces the instant wholesale and re-derives the BS triple.
    ///
    /// Returns the resulting instant in milliseconds.
    ///
    /// # Errors
    /// Returns [`DateError::InvalidInstant`] for unrepresentable timestamps
    /// and [`DateError::GregorianOutOfRange`] for instants outside the
    /// supported year range.
    pub fn set_time(&mut self, millis: i64) -> Result<i64, DateError> {
        let instant = DateTime::from_timestamp_millis(millis)
            .ok_or(DateError::InvalidInstant { millis })?;
        self.commit_gregorian(instant)
    }

    /// Replaces the Gregorian representation and re-derives the BS triple.
    ///
    /// # Errors
    /// Returns [`DateError::GregorianOutOfRange`] for instants outside the
    /// supported year range.
    pub fn set_gregorian(&mut self, instant: DateTime<Utc>) -> Result<i64, DateError> {
        self.commit_gregorian(instant)
    }

    /// Returns a new date on the first day of the current BS month, at the
    /// same time of day.
    ///
    /// # Errors
    /// Returns [`DateError::YearOutOfRange`] when the current year has no
    /// table entry.
    pub fn start_of_month(&self) -> Result<Self, DateError> {
        let mut date = *self;
        date.set_date(1)?;
        Ok(date)
    }

    /// Returns a new date one day **past** the last day of the current BS
    /// month, at the same time of day. The reported BS day is the one-past-end
    /// sentinel `month length + 1`, not the last valid day; subtract one day
    /// from the result to land on the true last day.
    ///
    /// # Errors
    /// Returns [`DateError::YearOutOfRange`] when the current year has no
    /// table entry.
    pub fn end_of_month(&self) -> Result<Self, DateError> {
        let mapping = table::lookup(self.bs.0)?;
        let mut date = *self;
        date.set_date(i32::from(mapping.month_length(self.bs.1)) + 1)?;
        Ok(date)
    }

    /// Renders `YEAR<delimiter>MM<delimiter>DD` with two-digit zero-padded
    /// month and day.
    pub fn to_date_string(&self, delimiter: char) -> String {
        format!(
            "{}{}{:02}{}{:02}",
            self.bs.0,
            delimiter,
            self.bs.1 + 1,
            delimiter,
            self.bs.2 + 1
        )
    }

    /// Renders the wall-clock time as zero-padded `HH:MM:SS.mmm`.
    pub fn to_time_string(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds()
        )
    }

    /// Renders the date through a token pattern. Recognized tokens: `YYYY`,
    /// `M`/`MM`, `D`/`DD` (BS date fields, 1-indexed), `H`/`HH`, `m`/`mm`,
    /// `s`/`ss`, `SSS` (wall clock), and `d` (weekday index). Unrecognized
    /// runs are copied through verbatim.
    pub fn format(&self, pattern: &str) -> String {
        format::render(self, pattern)
    }

    /// Stages a BS triple, derives the Gregorian field, and commits both on
    /// success. A failed derivation leaves the value untouched.
    fn commit_bs(&mut self, bs: (i32, usize, i32)) -> Result<i64, DateError> {
        let gregorian = convert::to_ad(bs, &self.gregorian)?;
        self.bs = bs;
        self.gregorian = gregorian;
        Ok(gregorian.timestamp_millis())
    }

    /// Stages a Gregorian instant, derives the BS triple, and commits both on
    /// success. A failed derivation leaves the value untouched.
    fn commit_gregorian(&mut self, instant: DateTime<Utc>) -> Result<i64, DateError> {
        let bs = convert::to_bs(&instant)?;
        self.gregorian = instant;
        self.bs = bs;
        Ok(instant.timestamp_millis())
    }

    fn with_time_of_day(
        &self,
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
    ) -> Result<DateTime<Utc>, DateError> {
        let midnight = self.time() - convert::ms_of_day(&self.gregorian);
        let millis =
            midnight + hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + milliseconds;
        DateTime::from_timestamp_millis(millis).ok_or(DateError::InvalidInstant { millis })
    }

    /// Helper to parse i32 with better error messages
    fn parse_i32(s: &str) -> Result<i32, ParseError> {
        s.parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    /// Helper to parse u32 with better error messages
    fn parse_u32(s: &str) -> Result<u32, ParseError> {
        s.parse::<u32>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl TryFrom<DateTime<Utc>> for NepaliDate {
    type Error = DateError;

    fn try_from(instant: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_gregorian(instant)
    }
}

impl FromStr for NepaliDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // Strictly enforce one delimiter kind per literal.
        let has_hyphen = trimmed.contains('-');
        let has_slash = trimmed.contains('/');
        let delimiter = match (has_hyphen, has_slash) {
            (true, true) => {
                return Err(ParseError::InvalidFormat(format!(
                    "Mixed delimiters (- and /): {trimmed}"
                )));
            }
            (true, false) => '-',
            (false, true) => '/',
            (false, false) => return Err(ParseError::InvalidFormat(trimmed.to_owned())),
        };

        let parts: Vec<&str> = trimmed.split(delimiter).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{delimiter}MM{delimiter}DD, found {trimmed}"
            )));
        }

        let year = Self::parse_i32(parts[0])?;
        let month = Self::parse_u32(parts[1])?;
        let day = Self::parse_u32(parts[2])?;

        Self::from_bs(year, month, day)
    }
}

impl fmt::Display for NepaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_date_string('/'))
    }
}

impl PartialOrd for NepaliDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NepaliDate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Instant first; stored components break ties so ordering agrees with
        // equality when a sentinel triple and a normalized triple denote the
        // same instant.
        (self.gregorian, self.bs).cmp(&(other.gregorian, other.bs))
    }
}

impl serde::Serialize for NepaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for NepaliDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
