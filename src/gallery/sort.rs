//! Ordering of filtered records.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::model::ImageRecord;

/// Sort options for the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the source order
    #[default]
    None,
    /// Newest first, undated records last
    Date,
    /// Smallest first, records of unknown size first
    Size,
}

impl SortKey {
    pub fn cycle(&self) -> Self {
        match self {
            SortKey::None => SortKey::Date,
            SortKey::Date => SortKey::Size,
            SortKey::Size => SortKey::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::None => "None",
            SortKey::Date => "Date",
            SortKey::Size => "Size",
        }
    }
}

/// Sort `records` in place by `key`. Stable: ties keep their relative order.
pub fn sort(records: &mut [&ImageRecord], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::Date => {
            // Option orders None before Some, so reversing puts undated last
            records.sort_by_key(|r| Reverse(r.uploaded_at));
        }
        SortKey::Size => {
            records.sort_by_key(|r| r.size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sized(sizes: &[u64]) -> Vec<ImageRecord> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| ImageRecord::new(i.to_string(), "u", format!("Author {i}")).with_size(size))
            .collect()
    }

    #[test]
    fn test_size_ascending() {
        let records = sized(&[500, 10, 300]);
        let mut refs: Vec<&ImageRecord> = records.iter().collect();
        sort(&mut refs, SortKey::Size);
        let sizes: Vec<Option<u64>> = refs.iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![Some(10), Some(300), Some(500)]);
    }

    #[test]
    fn test_size_adjacent_pairs_non_decreasing() {
        let records = sized(&[7, 3, 9, 3, 1, 10_000, 42, 0, 9]);
        let mut refs: Vec<&ImageRecord> = records.iter().collect();
        sort(&mut refs, SortKey::Size);
        assert!(refs.windows(2).all(|w| w[0].size <= w[1].size));
    }

    #[test]
    fn test_size_is_stable_and_unknown_first() {
        let mut records = sized(&[5, 5, 1]);
        records.push(ImageRecord::new("x", "u", "No size"));
        let mut refs: Vec<&ImageRecord> = records.iter().collect();
        sort(&mut refs, SortKey::Size);
        let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["x", "2", "0", "1"]);
    }

    #[test]
    fn test_date_newest_first_undated_last() {
        let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let records = vec![
            ImageRecord::new("undated", "u", "A"),
            ImageRecord::new("old", "u", "B").with_uploaded_at(old),
            ImageRecord::new("new", "u", "C").with_uploaded_at(new),
        ];
        let mut refs: Vec<&ImageRecord> = records.iter().collect();
        sort(&mut refs, SortKey::Date);
        let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["new", "old", "undated"]);
    }

    #[test]
    fn test_none_preserves_order() {
        let records = sized(&[3, 1, 2]);
        let mut refs: Vec<&ImageRecord> = records.iter().collect();
        sort(&mut refs, SortKey::None);
        let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2"]);
    }

    #[test]
    fn test_cycle_visits_every_key() {
        assert_eq!(SortKey::None.cycle(), SortKey::Date);
        assert_eq!(SortKey::Date.cycle(), SortKey::Size);
        assert_eq!(SortKey::Size.cycle(), SortKey::None);
    }
}
