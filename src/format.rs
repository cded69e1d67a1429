//! Token-based pattern rendering for [`NepaliDate`].
//!
//! Patterns are scanned as runs of identical characters; recognized runs are
//! substituted with date or time fields, everything else is copied through
//! verbatim.
//!
//! | Token  | Meaning                              |
//! |--------|--------------------------------------|
//! | `YYYY` | BS year                              |
//! | `M`/`MM`   | BS month, 1-indexed              |
//! | `D`/`DD`   | BS day of month, 1-indexed       |
//! | `H`/`HH`   | hours (24h)                      |
//! | `m`/`mm`   | minutes                          |
//! | `s`/`ss`   | seconds                          |
//! | `SSS`  | milliseconds                         |
//! | `d`    | Gregorian weekday index, Sunday = 0  |

use crate::NepaliDate;

pub(crate) fn render(date: &NepaliDate, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        let mut len = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            len += 1;
        }
        match substitute(date, ch, len) {
            Some(text) => out.push_str(&text),
            None => {
                for _ in 0..len {
                    out.push(ch);
                }
            }
        }
    }

    out
}

fn substitute(date: &NepaliDate, token: char, len: usize) -> Option<String> {
    match (token, len) {
        ('Y', 4) => Some(date.full_year().to_string()),
        ('M', 1) => Some((date.month() + 1).to_string()),
        ('M', 2) => Some(format!("{:02}", date.month() + 1)),
        ('D', 1) => Some(date.date().to_string()),
        ('D', 2) => Some(format!("{:02}", date.date())),
        ('H', 1) => Some(date.hours().to_string()),
        ('H', 2) => Some(format!("{:02}", date.hours())),
        ('m', 1) => Some(date.minutes().to_string()),
        ('m', 2) => Some(format!("{:02}", date.minutes())),
        ('s', 1) => Some(date.seconds().to_string()),
        ('s', 2) => Some(format!("{:02}", date.seconds())),
        ('S', 3) => Some(format!("{:03}", date.milliseconds())),
        ('d', 1) => Some(date.day().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NepaliDate {
        let mut date = NepaliDate::from_bs(2042, 6, 9).unwrap();
        date.set_hours(13, Some(45), Some(30), Some(7)).unwrap();
        date
    }

    #[test]
    fn renders_date_tokens() {
        let date = sample();
        assert_eq!(render(&date, "YYYY-MM-DD"), "2042-06-09");
        assert_eq!(render(&date, "D/M/YYYY"), "9/6/2042");
    }

    #[test]
    fn renders_time_tokens() {
        let date = sample();
        assert_eq!(render(&date, "HH:mm:ss.SSS"), "13:45:30.007");
        assert_eq!(render(&date, "H:m:s"), "13:45:30");
    }

    #[test]
    fn renders_weekday_token() {
        let date = sample();
        let weekday = render(&date, "d");
        assert_eq!(weekday, date.day().to_string());
    }

    #[test]
    fn unknown_runs_pass_through() {
        let date = sample();
        assert_eq!(render(&date, "QQ YYYY!"), "QQ 2042!");
        assert_eq!(render(&date, ""), "");
        assert_eq!(render(&date, "YYY"), "YYY");
    }
}
