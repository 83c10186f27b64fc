//! Date helpers shared by the store format, forms and templates.
//!
//! Calendar dates travel as `YYYY-MM-DD`, timestamps as RFC 3339
//! (`time::serde::rfc3339`). The serde adapter for dates lives next to the
//! records in `types`.

use time::macros::format_description;
use time::{Date, Month};

pub fn format_iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Strict `YYYY-MM-DD`; signed or unpadded input is rejected.
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if !raw.starts_with(|ch: char| ch.is_ascii_digit()) {
        return None;
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

/// `DD/MM/YYYY`, the format used on every page.
pub fn format_display_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn parse_iso_date__should_accept_padded_dates() {
        // When
        let date = parse_iso_date("2025-02-01").expect("date");

        // Then
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), Month::February);
        assert_eq!(date.day(), 1);
        assert_eq!(format_iso_date(date), "2025-02-01");
    }

    #[test]
    fn parse_iso_date__should_reject_invalid_values() {
        assert!(parse_iso_date("").is_none());
        assert!(parse_iso_date("2025-02-30").is_none());
        assert!(parse_iso_date("2025-13-01").is_none());
        assert!(parse_iso_date("yesterday").is_none());
        assert!(parse_iso_date("+2025-01-05").is_none());
        assert!(parse_iso_date("2025-1-5").is_none());
        assert!(parse_iso_date("2025-01-05T10:00").is_none());
    }

    #[test]
    fn format_display_date__should_use_day_first() {
        let date = parse_iso_date("2026-10-05").expect("date");
        assert_eq!(format_display_date(date), "05/10/2026");
    }
}
