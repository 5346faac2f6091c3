//! Immutable view state and the reducer that advances it.

use serde::{Deserialize, Serialize};

use super::paginate::DEFAULT_PAGE_SIZE;
use super::sort::SortKey;

/// Layout of the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Thumbnails only
    #[default]
    Grid,
    /// Thumbnail plus author, date and size
    List,
}

impl ViewMode {
    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
        }
    }
}

/// A user request against the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    SetView(ViewMode),
    ToggleView,
    SetSort(SortKey),
    CycleSort,
    SetSearch(String),
    PushSearchChar(char),
    PopSearchChar,
    ClearSearch,
    /// Request a 1-indexed page. Ignored when out of range.
    SelectPage(usize),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
}

/// Everything the user has chosen about how the gallery is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub view: ViewMode,
    pub sort: SortKey,
    pub search: String,
    /// Current page, 1-indexed
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            sort: SortKey::default(),
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    pub fn new(view: ViewMode, sort: SortKey, page_size: usize) -> Self {
        Self {
            view,
            sort,
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Apply `event`, producing the next state. `page_count` is the number
    /// of pages the current state yields and bounds page navigation.
    pub fn reduce(&self, event: &GalleryEvent, page_count: usize) -> ViewState {
        let page_count = page_count.max(1);
        let mut next = self.clone();

        match event {
            GalleryEvent::SetView(view) => next.view = *view,
            GalleryEvent::ToggleView => next.view = self.view.toggle(),
            GalleryEvent::SetSort(sort) => next.sort = *sort,
            GalleryEvent::CycleSort => next.sort = self.sort.cycle(),
            GalleryEvent::SetSearch(term) => next.search = term.clone(),
            GalleryEvent::PushSearchChar(c) => next.search.push(*c),
            GalleryEvent::PopSearchChar => {
                next.search.pop();
            }
            GalleryEvent::ClearSearch => next.search.clear(),
            GalleryEvent::SelectPage(page) => {
                if (1..=page_count).contains(page) {
                    next.page = *page;
                }
            }
            GalleryEvent::NextPage => next.page = (self.page + 1).min(page_count),
            GalleryEvent::PrevPage => next.page = self.page.saturating_sub(1).max(1),
            GalleryEvent::FirstPage => next.page = 1,
            GalleryEvent::LastPage => next.page = page_count,
        }

        // A new term invalidates earlier page positions
        if next.search != self.search {
            next.page = 1;
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: usize) -> ViewState {
        ViewState {
            page,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_defaults() {
        let state = ViewState::default();
        assert_eq!(state.view, ViewMode::Grid);
        assert_eq!(state.sort, SortKey::None);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 9);
    }

    #[test]
    fn test_reduce_does_not_mutate_previous_state() {
        let before = on_page(3);
        let after = before.reduce(&GalleryEvent::ToggleView, 5);
        assert_eq!(before.view, ViewMode::Grid);
        assert_eq!(after.view, ViewMode::List);
        assert_eq!(after.page, 3);
    }

    #[test]
    fn test_search_changes_reset_page() {
        let events = [
            GalleryEvent::SetSearch("author".into()),
            GalleryEvent::PushSearchChar('a'),
        ];
        for event in events {
            assert_eq!(on_page(4).reduce(&event, 12).page, 1, "{event:?}");
        }

        let mut searching = on_page(4);
        searching.search = "ab".into();
        assert_eq!(searching.reduce(&GalleryEvent::PopSearchChar, 12).page, 1);
        assert_eq!(searching.reduce(&GalleryEvent::ClearSearch, 12).page, 1);
    }

    #[test]
    fn test_unchanged_search_keeps_page() {
        let mut state = on_page(4);
        state.search = "same".into();
        let next = state.reduce(&GalleryEvent::SetSearch("same".into()), 12);
        assert_eq!(next.page, 4);

        // Popping from an empty term changes nothing
        assert_eq!(on_page(4).reduce(&GalleryEvent::PopSearchChar, 12).page, 4);
    }

    #[test]
    fn test_select_page_rejects_out_of_range() {
        let state = on_page(2);
        assert_eq!(state.reduce(&GalleryEvent::SelectPage(5), 12).page, 5);
        assert_eq!(state.reduce(&GalleryEvent::SelectPage(0), 12).page, 2);
        assert_eq!(state.reduce(&GalleryEvent::SelectPage(13), 12).page, 2);
    }

    #[test]
    fn test_page_navigation_saturates() {
        assert_eq!(on_page(12).reduce(&GalleryEvent::NextPage, 12).page, 12);
        assert_eq!(on_page(1).reduce(&GalleryEvent::PrevPage, 12).page, 1);
        assert_eq!(on_page(5).reduce(&GalleryEvent::NextPage, 12).page, 6);
        assert_eq!(on_page(5).reduce(&GalleryEvent::PrevPage, 12).page, 4);
        assert_eq!(on_page(5).reduce(&GalleryEvent::LastPage, 12).page, 12);
        assert_eq!(on_page(5).reduce(&GalleryEvent::FirstPage, 12).page, 1);
        assert_eq!(on_page(1).reduce(&GalleryEvent::LastPage, 0).page, 1);
    }

    #[test]
    fn test_sort_and_view_events() {
        let state = ViewState::default();
        assert_eq!(state.reduce(&GalleryEvent::CycleSort, 1).sort, SortKey::Date);
        assert_eq!(state.reduce(&GalleryEvent::SetSort(SortKey::Size), 1).sort, SortKey::Size);
        assert_eq!(state.reduce(&GalleryEvent::SetView(ViewMode::List), 1).view, ViewMode::List);
    }

    #[test]
    fn test_new_guards_page_size() {
        assert_eq!(ViewState::new(ViewMode::List, SortKey::Date, 0).page_size, 1);
    }
}
