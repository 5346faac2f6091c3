//! The image record shared by every stage of the gallery.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt::Write;

/// Default display format for upload dates.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single image in the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Unique within a loaded set
    pub id: String,
    /// Location of the image itself
    pub url: String,
    /// Display label
    pub author: String,
    /// `None` when the source value was missing or unparsable
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Size in bytes, `None` when unknown
    pub size: Option<u64>,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>, url: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            author: author.into(),
            uploaded_at: None,
            size: None,
        }
    }

    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = Some(uploaded_at);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Upload date rendered with `date_format`, or "unknown".
    pub fn formatted_date(&self, date_format: &str) -> String {
        match self.uploaded_at {
            Some(dt) => format_date(dt, date_format),
            None => "unknown".to_string(),
        }
    }

    /// Size rendered in kilobytes, or "unknown".
    pub fn formatted_size(&self) -> String {
        match self.size {
            Some(bytes) => format_size(bytes),
            None => "unknown".to_string(),
        }
    }
}

/// Whether chrono understands every specifier in `date_format`.
pub fn is_valid_date_format(date_format: &str) -> bool {
    StrftimeItems::new(date_format).all(|item| !matches!(item, Item::Error))
}

/// Render `dt` with `date_format`, falling back to [`DEFAULT_DATE_FORMAT`]
/// when the format is rejected.
pub fn format_date(dt: DateTime<Utc>, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format(date_format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", dt.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Format a byte count as kilobytes with one decimal.
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Parse a size that may be a bare number or a formatted string such as
/// `"1.5 KB"` or `"2MB"`. Returns bytes.
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let magnitude: f64 = number.parse().ok()?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        return None;
    }

    let multiplier: f64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" | "bytes" => 1.0,
        "k" | "kb" | "kib" => 1024.0,
        "m" | "mb" | "mib" => 1024.0 * 1024.0,
        "g" | "gb" | "gib" => 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };

    Some((magnitude * multiplier).round() as u64)
}

/// Parse an upload timestamp. Accepts RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare date.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_size_plain_and_formatted() {
        assert_eq!(parse_size("500"), Some(500));
        assert_eq!(parse_size("1.5 KB"), Some(1536));
        assert_eq!(parse_size("2MB"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size(" 10 b "), Some(10));
        assert_eq!(parse_size("9.8 KB"), Some(10035));
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("KB"), None);
        assert_eq!(parse_size("12 parsecs"), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_formatting() {
        let record = ImageRecord::new("1", "u", "Author 1")
            .with_size(2048)
            .with_uploaded_at(Utc.with_ymd_and_hms(2023, 12, 24, 8, 0, 0).unwrap());
        assert_eq!(record.formatted_size(), "2.0 KB");
        assert_eq!(record.formatted_date(DEFAULT_DATE_FORMAT), "2023-12-24");

        let bare = ImageRecord::new("2", "u", "Author 2");
        assert_eq!(bare.formatted_size(), "unknown");
        assert_eq!(bare.formatted_date(DEFAULT_DATE_FORMAT), "unknown");
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let dt = Utc.with_ymd_and_hms(2022, 5, 9, 0, 0, 0).unwrap();
        assert_eq!(format_date(dt, "%Q"), "2022-05-09");
        assert_eq!(format_date(dt, "%d/%m/%Y"), "09/05/2022");

        let record = ImageRecord::new("1", "u", "A").with_uploaded_at(dt);
        assert_eq!(record.formatted_date("%Y %"), "2022-05-09");
    }

    #[test]
    fn test_date_format_validation() {
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));
        assert!(is_valid_date_format("%d %b %Y, %H:%M"));
        assert!(!is_valid_date_format("%Q"));
        assert!(!is_valid_date_format("%Y-%"));
    }
}
