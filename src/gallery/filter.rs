//! Free-text filtering of image records.

use crate::model::{format_date, format_size, ImageRecord};

/// Keep the records whose author, formatted date, formatted size or raw
/// byte count contains `term`, ignoring case. An empty term keeps
/// everything. Order is preserved.
pub fn filter<'a, I>(records: I, term: &str, date_format: &str) -> Vec<&'a ImageRecord>
where
    I: IntoIterator<Item = &'a ImageRecord>,
{
    let term = term.to_lowercase();
    if term.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| matches(record, &term, date_format))
        .collect()
}

fn matches(record: &ImageRecord, term: &str, date_format: &str) -> bool {
    if record.author.to_lowercase().contains(term) {
        return true;
    }
    // Missing values have no text to match, not even their placeholder
    if let Some(dt) = record.uploaded_at {
        if format_date(dt, date_format).to_lowercase().contains(term) {
            return true;
        }
    }
    match record.size {
        Some(bytes) => format_size(bytes).to_lowercase().contains(term) || bytes.to_string().contains(term),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_DATE_FORMAT;
    use chrono::{TimeZone, Utc};

    fn authors(count: usize) -> Vec<ImageRecord> {
        (1..=count)
            .map(|i| ImageRecord::new(i.to_string(), format!("https://img/{i}"), format!("Author {i}")))
            .collect()
    }

    fn names(records: &[&ImageRecord]) -> Vec<String> {
        records.iter().map(|r| r.author.clone()).collect()
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let records = authors(5);
        assert_eq!(filter(&records, "", DEFAULT_DATE_FORMAT).len(), 5);
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let mut records: Vec<ImageRecord> = std::iter::once(5)
            .chain(51..=59)
            .map(|i| ImageRecord::new(i.to_string(), "u", format!("Author {i}")))
            .collect();
        records.push(ImageRecord::new("4", "u", "Author 4"));
        records.push(ImageRecord::new("60", "u", "Author 60"));

        let found = filter(&records, "author 5", DEFAULT_DATE_FORMAT);
        assert_eq!(found.len(), 10);
        assert!(!names(&found).contains(&"Author 4".to_string()));
        assert!(!names(&found).contains(&"Author 60".to_string()));
    }

    #[test]
    fn test_substring_match_over_hundred() {
        let records = authors(100);
        let found = filter(&records, "AUTHOR 5", DEFAULT_DATE_FORMAT);
        let mut expected = vec!["Author 5".to_string()];
        expected.extend((50..=59).map(|i| format!("Author {i}")));
        assert_eq!(names(&found), expected);
    }

    #[test]
    fn test_matches_date_and_size() {
        let records = vec![
            ImageRecord::new("1", "u", "Alice")
                .with_uploaded_at(Utc.with_ymd_and_hms(2021, 7, 4, 0, 0, 0).unwrap()),
            ImageRecord::new("2", "u", "Bob").with_size(4321),
            ImageRecord::new("3", "u", "Carol").with_size(2048),
        ];

        assert_eq!(names(&filter(&records, "2021-07", DEFAULT_DATE_FORMAT)), ["Alice"]);
        assert_eq!(names(&filter(&records, "4321", DEFAULT_DATE_FORMAT)), ["Bob"]);
        assert_eq!(names(&filter(&records, "2.0 kb", DEFAULT_DATE_FORMAT)), ["Carol"]);
    }

    #[test]
    fn test_missing_fields_do_not_match_placeholder() {
        let records = crate::source::remote::parse_list(
            r#"[
                {"id": "0", "author": "Alejandro Escamilla", "download_url": "https://picsum.photos/id/0/5000/3333"},
                {"id": "1", "author": "Paul Jarvis", "download_url": "https://picsum.photos/id/1/5000/3333"}
            ]"#,
        )
        .unwrap();
        assert!(records.iter().all(|r| r.uploaded_at.is_none() && r.size.is_none()));

        for term in ["own", "unk", "unknown"] {
            assert!(filter(&records, term, DEFAULT_DATE_FORMAT).is_empty(), "term {term:?}");
        }
        assert_eq!(names(&filter(&records, "n", DEFAULT_DATE_FORMAT)), ["Alejandro Escamilla"]);
    }

    #[test]
    fn test_bad_date_format_does_not_panic() {
        let records = vec![ImageRecord::new("1", "u", "Alice")
            .with_uploaded_at(Utc.with_ymd_and_hms(2021, 7, 4, 0, 0, 0).unwrap())];
        assert!(filter(&records, "x", "%Q").is_empty());
        assert_eq!(names(&filter(&records, "2021", "%Q")), ["Alice"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = authors(100);
        for term in ["", "1", "author 7", "thor 9", "zzz"] {
            let once = filter(&records, term, DEFAULT_DATE_FORMAT);
            let twice = filter(once.iter().copied(), term, DEFAULT_DATE_FORMAT);
            assert_eq!(once, twice, "term {term:?}");
        }
    }
}
