//! Memoized filter → sort → paginate derivation.

use std::sync::Arc;

use super::filter::filter;
use super::paginate::{paginate, Page};
use super::sort::{sort, SortKey};
use super::state::ViewState;
use crate::model::ImageRecord;

/// The records to show plus where they sit in the whole result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPage {
    pub records: Vec<ImageRecord>,
    pub page: Page,
    /// Number of records matching the search term
    pub total: usize,
}

/// Inputs the ordering depends on.
struct OrderKey {
    records: Arc<[ImageRecord]>,
    search: String,
    sort: SortKey,
}

impl OrderKey {
    fn matches(&self, records: &Arc<[ImageRecord]>, state: &ViewState) -> bool {
        Arc::ptr_eq(&self.records, records) && self.search == state.search && self.sort == state.sort
    }
}

/// Derives the visible page from the loaded records and the view state.
///
/// The filtered and sorted ordering is cached against the record set
/// identity, search term and sort key. Pagination is always recomputed.
pub struct Pipeline {
    date_format: String,
    key: Option<OrderKey>,
    /// Matching records in display order
    ordered: Vec<ImageRecord>,
    recomputations: usize,
}

impl Pipeline {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            key: None,
            ordered: Vec::new(),
            recomputations: 0,
        }
    }

    /// Number of records matching the current search.
    pub fn total(&mut self, records: &Arc<[ImageRecord]>, state: &ViewState) -> usize {
        self.refresh(records, state);
        self.ordered.len()
    }

    /// Page count for the current search and page size.
    pub fn page_count(&mut self, records: &Arc<[ImageRecord]>, state: &ViewState) -> usize {
        let total = self.total(records, state);
        super::paginate::page_count(total, state.page_size)
    }

    pub fn derive(&mut self, records: &Arc<[ImageRecord]>, state: &ViewState) -> GalleryPage {
        self.refresh(records, state);

        let page = paginate(self.ordered.len(), state.page, state.page_size);
        GalleryPage {
            records: page.slice(&self.ordered).to_vec(),
            page,
            total: self.ordered.len(),
        }
    }

    /// How many times the ordering has been rebuilt.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    fn refresh(&mut self, records: &Arc<[ImageRecord]>, state: &ViewState) {
        if self.key.as_ref().is_some_and(|k| k.matches(records, state)) {
            return;
        }

        let mut kept = filter(records.iter(), &state.search, &self.date_format);
        sort(&mut kept, state.sort);
        self.ordered = kept.into_iter().cloned().collect();
        self.key = Some(OrderKey {
            records: Arc::clone(records),
            search: state.search.clone(),
            sort: state.sort,
        });
        self.recomputations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::state::GalleryEvent;
    use crate::model::DEFAULT_DATE_FORMAT;
    use crate::source::{ImageSource, SyntheticSource};

    fn hundred() -> Arc<[ImageRecord]> {
        let records = SyntheticSource::new(100).with_seed(7).load().unwrap();
        Arc::from(records)
    }

    #[test]
    fn test_first_page_of_hundred_synthesized() {
        let records = hundred();
        let mut pipeline = Pipeline::new(DEFAULT_DATE_FORMAT);
        let state = ViewState {
            sort: SortKey::Size,
            ..ViewState::default()
        };

        let page = pipeline.derive(&records, &state);
        assert_eq!(page.records.len(), 9);
        assert_eq!(page.page.count, 12);
        assert_eq!(page.total, 100);

        let mut expected: Vec<&ImageRecord> = records.iter().collect();
        sort(&mut expected, SortKey::Size);
        let expected: Vec<ImageRecord> = expected.into_iter().take(9).cloned().collect();
        assert_eq!(page.records, expected);
    }

    #[test]
    fn test_empty_record_set() {
        let records: Arc<[ImageRecord]> = Arc::from(Vec::new());
        let mut pipeline = Pipeline::new(DEFAULT_DATE_FORMAT);
        let page = pipeline.derive(&records, &ViewState::default());
        assert_eq!(page.page.count, 1);
        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_paging_reuses_ordering() {
        let records = hundred();
        let mut pipeline = Pipeline::new(DEFAULT_DATE_FORMAT);
        let mut state = ViewState::default();

        pipeline.derive(&records, &state);
        for _ in 0..5 {
            let count = pipeline.page_count(&records, &state);
            state = state.reduce(&GalleryEvent::NextPage, count);
            pipeline.derive(&records, &state);
        }
        assert_eq!(state.page, 6);
        assert_eq!(pipeline.recomputations(), 1);

        state = state.reduce(&GalleryEvent::PushSearchChar('7'), 12);
        pipeline.derive(&records, &state);
        assert_eq!(pipeline.recomputations(), 2);
    }

    #[test]
    fn test_new_record_set_invalidates() {
        let mut pipeline = Pipeline::new(DEFAULT_DATE_FORMAT);
        let state = ViewState::default();
        pipeline.derive(&hundred(), &state);
        pipeline.derive(&hundred(), &state);
        assert_eq!(pipeline.recomputations(), 2);
    }

    #[test]
    fn test_search_narrows_and_resets() {
        let records = hundred();
        let mut pipeline = Pipeline::new(DEFAULT_DATE_FORMAT);
        let state = ViewState {
            page: 3,
            ..ViewState::default()
        };

        let count = pipeline.page_count(&records, &state);
        let state = state.reduce(&GalleryEvent::SetSearch("Author 5".into()), count);
        let page = pipeline.derive(&records, &state);
        assert_eq!(state.page, 1);
        assert_eq!(page.total, 11);
        assert_eq!(page.page.count, 2);
        assert_eq!(page.records[0].author, "Author 5");
    }
}
