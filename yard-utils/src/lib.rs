//! Shared utility functions for the yard crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Storage and CSV format: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format used on printed reports: "DD/MM/YYYY"
    pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

    /// Day/month label used on chart axes: "DD/MM"
    pub const SHORT_FORMAT: &str = "%d/%m";

    /// Report generation stamp: "DD/MM/YYYY HH:MM"
    pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Format a NaiveDate as "DD/MM/YYYY"
    pub fn format_display(date: &NaiveDate) -> String {
        date.format(DISPLAY_FORMAT).to_string()
    }

    /// Format a NaiveDate as "DD/MM"
    pub fn format_short(date: &NaiveDate) -> String {
        date.format(SHORT_FORMAT).to_string()
    }

    pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a date string.
    ///
    /// Accepts "YYYY-MM-DD", "DD/MM/YYYY", and ISO datetimes such as
    /// "2024-06-15T00:00:00.000" (the time part is dropped).
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Ok(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DISPLAY_FORMAT) {
            return Ok(date);
        }
        match trimmed.split_once('T') {
            Some((date_part, _)) => Ok(NaiveDate::parse_from_str(date_part, DATE_FORMAT)?),
            None => anyhow::bail!("unrecognized date: {trimmed:?}"),
        }
    }

}

/// Number formatting and rounding
pub mod numbers {
    /// Round to a fixed number of decimal places (half away from zero).
    pub fn round_to(value: f64, places: i32) -> f64 {
        let scale = 10f64.powi(places);
        (value * scale).round() / scale
    }

    /// Format with a fixed number of decimals and comma thousands separators,
    /// e.g. `12345.6` with 0 decimals -> "12,346".
    pub fn group_thousands(value: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (formatted.as_str(), None),
        };
        let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if let Some(frac) = frac_part {
            grouped.push('.');
            grouped.push_str(frac);
        }
        let is_zero = grouped.chars().all(|c| matches!(c, '0' | ',' | '.'));
        if value.is_sign_negative() && !is_zero {
            format!("-{grouped}")
        } else {
            grouped
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round_to() {
            assert_eq!(round_to(32.500000000000004, 2), 32.5);
            assert_eq!(round_to(8.333333, 2), 8.33);
            assert_eq!(round_to(0.3, 4), 0.3);
            assert_eq!(round_to(-2.456, 2), -2.46);
        }

        #[test]
        fn test_group_thousands() {
            assert_eq!(group_thousands(12345.6, 0), "12,346");
            assert_eq!(group_thousands(999.0, 0), "999");
            assert_eq!(group_thousands(1000.0, 0), "1,000");
            assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
            assert_eq!(group_thousands(-4500.0, 1), "-4,500.0");
            assert_eq!(group_thousands(-0.2, 0), "0");
        }
    }
}
