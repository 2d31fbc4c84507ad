//! Shared utility functions for the water quality dashboard crates.

/// Timestamp parsing and display.
///
/// One normalization rule for every view: timestamps are parsed as
/// RFC 3339 when they carry an offset, naive timestamps are taken as UTC,
/// and display always converts to an explicit `FixedOffset`.
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

    /// Naive layouts accepted from the ingestion service, interpreted as UTC.
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    /// Epoch values above this are milliseconds rather than seconds.
    const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

    /// Parse a service timestamp into UTC.
    pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DateError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(DateError("empty timestamp".to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }

        if let Ok(epoch) = s.parse::<i64>() {
            let parsed = if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            };
            if let Some(dt) = parsed {
                return Ok(dt);
            }
        }

        Err(DateError(format!("unrecognized timestamp '{}'", s)))
    }

    /// 24-hour `HH:MM:SS` label used on the chart's x-axis.
    pub fn format_time_label(ts: &DateTime<Utc>, offset: &FixedOffset) -> String {
        ts.with_timezone(offset).format("%H:%M:%S").to_string()
    }

    /// `YYYY-MM-DD HH:MM:SS` in the display offset.
    pub fn format_table_timestamp(ts: &DateTime<Utc>, offset: &FixedOffset) -> String {
        ts.with_timezone(offset).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Table cell text for an optional raw timestamp.
    ///
    /// Unparseable values are shown verbatim; missing ones as "–".
    pub fn display_timestamp(raw: Option<&str>, offset: &FixedOffset) -> String {
        match raw {
            Some(s) => match parse_timestamp(s) {
                Ok(ts) => format_table_timestamp(&ts, offset),
                Err(_) => s.to_string(),
            },
            None => "–".to_string(),
        }
    }

    /// Human readable offset, e.g. "UTC+07:00".
    pub fn format_offset(offset: &FixedOffset) -> String {
        let secs = offset.local_minus_utc();
        let sign = if secs < 0 { '-' } else { '+' };
        let secs = secs.abs();
        format!("UTC{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::Timelike;

        fn wib() -> FixedOffset {
            FixedOffset::east_opt(7 * 3600).unwrap()
        }

        #[test]
        fn test_parse_rfc3339() {
            let ts = parse_timestamp("2025-01-01T00:00:00Z").unwrap();
            assert_eq!(ts.hour(), 0);
            let ts = parse_timestamp("2025-01-01T07:30:00+07:00").unwrap();
            assert_eq!(ts.hour(), 0);
            assert_eq!(ts.minute(), 30);
        }

        #[test]
        fn test_parse_naive_is_utc() {
            let ts = parse_timestamp("2025-01-01 08:15:00").unwrap();
            assert_eq!(ts.hour(), 8);
            let ts = parse_timestamp("2025-01-01T08:15:00.250").unwrap();
            assert_eq!(ts.minute(), 15);
        }

        #[test]
        fn test_parse_epoch() {
            let secs = parse_timestamp("1735689600").unwrap();
            let millis = parse_timestamp("1735689600000").unwrap();
            assert_eq!(secs, millis);
            assert_eq!(secs, parse_timestamp("2025-01-01T00:00:00Z").unwrap());
        }

        #[test]
        fn test_parse_garbage() {
            assert!(parse_timestamp("").is_err());
            assert!(parse_timestamp("yesterday").is_err());
        }

        #[test]
        fn test_format_in_offset() {
            let ts = parse_timestamp("2025-01-01T23:30:05Z").unwrap();
            assert_eq!(format_time_label(&ts, &wib()), "06:30:05");
            assert_eq!(format_table_timestamp(&ts, &wib()), "2025-01-02 06:30:05");
        }

        #[test]
        fn test_display_timestamp_fallbacks() {
            assert_eq!(display_timestamp(None, &wib()), "–");
            assert_eq!(display_timestamp(Some("not a date"), &wib()), "not a date");
            assert_eq!(
                display_timestamp(Some("2025-01-01T00:00:00Z"), &wib()),
                "2025-01-01 07:00:00"
            );
        }

        #[test]
        fn test_format_offset() {
            assert_eq!(format_offset(&wib()), "UTC+07:00");
            assert_eq!(format_offset(&FixedOffset::west_opt(3 * 3600 + 1800).unwrap()), "UTC-03:30");
        }
    }
}

/// Number formatting for cards, banners and tables.
pub mod numbers {
    /// Format with at most two fraction digits and thousands separators,
    /// e.g. `1234.567` → "1,234.57", `620.0` → "620", `0.6` → "0.6".
    pub fn format_number(value: f64) -> String {
        if !value.is_finite() {
            return "–".to_string();
        }
        let fixed = format!("{:.2}", value);
        let trimmed = if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.')
        } else {
            fixed.as_str()
        };

        let (sign, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if grouped == "0" && frac_part.is_none() { "" } else { sign };
        match frac_part {
            Some(f) => format!("{}{}.{}", sign, grouped, f),
            None => format!("{}{}", sign, grouped),
        }
    }

    /// Optional value, "–" when absent.
    pub fn format_optional(value: Option<f64>) -> String {
        value.map(format_number).unwrap_or_else(|| "–".to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_number() {
            assert_eq!(format_number(620.0), "620");
            assert_eq!(format_number(6.2), "6.2");
            assert_eq!(format_number(0.6), "0.6");
            assert_eq!(format_number(1234.567), "1,234.57");
            assert_eq!(format_number(1_000_000.0), "1,000,000");
            assert_eq!(format_number(-1500.5), "-1,500.5");
            assert_eq!(format_number(-0.001), "0");
            assert_eq!(format_number(f64::NAN), "–");
        }

        #[test]
        fn test_format_optional() {
            assert_eq!(format_optional(None), "–");
            assert_eq!(format_optional(Some(7.25)), "7.25");
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
