//! Lenient parsing of display dates and the newest-first ordering used by
//! every rendered list.
//!
//! Dates are free-form text copied out of the content files, so nothing here
//! validates them. A date that can't be parsed is "invalid" and sorts after
//! every valid date; ties (including between invalid dates) keep the order
//! they had going in.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Borrow;
use std::cmp::Reverse;

use crate::record::Record;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%A, %B %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses a display date, trying a handful of common shapes. Returns `None`
/// for anything unrecognised (including [`crate::record::UNKNOWN_DATE`]).
pub fn parse_loose(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(input, format) {
            return Some(date_time);
        }
    }

    // Plain dates have no time component, so pin them to midnight.
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Sorts records newest first. Invalid dates go last; the sort is stable.
pub fn sort_newest_first<R: Borrow<Record>>(records: &mut [R]) {
    records.sort_by_cached_key(|record| {
        let parsed = parse_loose(&record.borrow().date);
        (parsed.is_none(), Reverse(parsed))
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::UNKNOWN_DATE;

    fn record(url: &str, date: &str) -> Record {
        Record {
            category: String::from("posts"),
            title: String::from("title"),
            date: date.to_owned(),
            tags: Vec::new(),
            url: url.to_owned(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(ymd(2024, 1, 10), parse_loose("2024-01-10"));
        assert_eq!(ymd(2024, 1, 10), parse_loose("  2024/01/10 "));
    }

    #[test]
    fn test_parse_long_form_dates() {
        assert_eq!(ymd(2024, 3, 1), parse_loose("March 1, 2024"));
        assert_eq!(ymd(2024, 3, 1), parse_loose("Mar 1, 2024"));
        assert_eq!(ymd(2024, 3, 1), parse_loose("1 March 2024"));
        assert_eq!(ymd(2024, 3, 1), parse_loose("Friday, March 1, 2024"));
    }

    #[test]
    fn test_parse_date_time() {
        let parsed = parse_loose("2024-03-01 13:45").unwrap();
        assert_eq!(
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(13, 45, 0)),
            Some(parsed)
        );
        assert!(parse_loose("2024-03-01T13:45:00+02:00").is_some());
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(None, parse_loose(UNKNOWN_DATE));
        assert_eq!(None, parse_loose(""));
        assert_eq!(None, parse_loose("2024-13-40"));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = vec![
            record("/posts/jan.html", "2024-01-10"),
            record("/posts/none.html", UNKNOWN_DATE),
            record("/posts/mar.html", "March 1, 2024"),
            record("/posts/garbage.html", "someday"),
            record("/posts/dec.html", "2023-12-31"),
        ];
        sort_newest_first(&mut records);
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            vec![
                "/posts/mar.html",
                "/posts/jan.html",
                "/posts/dec.html",
                // invalid dates last, in their original order
                "/posts/none.html",
                "/posts/garbage.html",
            ],
            urls
        );
    }

    #[test]
    fn test_sort_references_is_stable() {
        let a = record("/posts/a.html", "2024-01-10");
        let b = record("/posts/b.html", "2024-01-10");
        let mut records = vec![&a, &b];
        sort_newest_first(&mut records);
        assert_eq!("/posts/a.html", records[0].url);
        assert_eq!("/posts/b.html", records[1].url);
    }
}
