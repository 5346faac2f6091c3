//! Fixed-size, 1-indexed pagination.

/// Records per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// A resolved page: which page is shown and the slice bounds it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Effective page number, always within `1..=count`
    pub number: usize,
    /// Total number of pages, at least 1
    pub count: usize,
    /// Start index into the ordered sequence (inclusive)
    pub start: usize,
    /// End index into the ordered sequence (exclusive)
    pub end: usize,
}

impl Page {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The part of `items` this page covers.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start..self.end]
    }
}

/// Number of pages needed for `len` items. Never less than 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Resolve `page` of a sequence of `len` items. Out-of-range requests are
/// clamped to the nearest valid page, so a non-empty sequence never yields
/// an empty page.
pub fn paginate(len: usize, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let count = page_count(len, page_size);
    let number = page.clamp(1, count);
    let start = ((number - 1) * page_size).min(len);
    let end = (start + page_size).min(len);

    Page {
        number,
        count,
        start,
        end,
    }
}
