//! View-state derivation for the gallery.
//!
//! Records flow one way through three pure stages, recomputed whenever
//! an input changes:
//!
//! ```text
//! records -> filter(search) -> sort(key) -> paginate(page, page_size)
//! ```
//!
//! [`ViewState`] holds the user's choices and only changes through
//! [`ViewState::reduce`]. [`Pipeline`] caches the filtered and sorted
//! ordering so that paging does not redo the expensive stages.

pub mod filter;
pub mod paginate;
pub mod pipeline;
pub mod sort;
pub mod state;

pub use filter::filter;
pub use paginate::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use pipeline::{GalleryPage, Pipeline};
pub use sort::{sort, SortKey};
pub use state::{GalleryEvent, ViewMode, ViewState};
