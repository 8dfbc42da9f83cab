use serde::Serialize;

/// Zero-based inclusive row span for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowRange {
    pub(crate) from: i64,
    pub(crate) to: i64,
}

impl RowRange {
    pub(crate) fn limit(self) -> i64 {
        self.to - self.from + 1
    }
}

/// `page` is 1-based and must already be validated as `>= 1`.
pub(crate) fn range_for(page: i64, page_size: i64) -> RowRange {
    let from = (page - 1) * page_size;
    RowRange { from, to: from + page_size - 1 }
}

pub(crate) fn page_count(total_rows: i64, page_size: i64) -> i64 {
    if total_rows <= 0 || page_size <= 0 {
        return 0;
    }
    (total_rows + page_size - 1) / page_size
}

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) page: i64,
    pub(crate) page_size: i64,
    pub(crate) page_count: i64,
    pub(crate) has_previous: bool,
    pub(crate) has_next: bool,
}

impl<T> PaginatedResponse<T> {
    pub(crate) fn new(items: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        let page_count = page_count(total_count, page_size);
        Self {
            items,
            total_count,
            page,
            page_size,
            page_count,
            has_previous: page > 1,
            has_next: page < page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_third_page_ranges() {
        assert_eq!(range_for(1, 10), RowRange { from: 0, to: 9 });
        assert_eq!(range_for(3, 10), RowRange { from: 20, to: 29 });
        assert_eq!(range_for(3, 10).limit(), 10);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(0, 10), 0);
    }

    #[test]
    fn navigation_flags_track_bounds() {
        let first = PaginatedResponse::<()>::new(Vec::new(), 25, 1, 10);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = PaginatedResponse::<()>::new(Vec::new(), 25, 3, 10);
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert_eq!(last.page_count, 3);
    }

    #[test]
    fn empty_listing_has_no_next_page() {
        let empty = PaginatedResponse::<()>::new(Vec::new(), 0, 1, 10);
        assert_eq!(empty.page_count, 0);
        assert!(!empty.has_previous);
        assert!(!empty.has_next);
    }
}
