//! Pagination types and the paginator capability.

use serde::{Deserialize, Serialize};

use domain::{DEFAULT_PAGE_NUMBER, MAX_PAGE_SIZE, USERS_PER_PAGE};

/// Pagination parameters (1-indexed page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    USERS_PER_PAGE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Number of items to skip. Saturates instead of overflowing, so a huge
    /// page number lands past the end of any collection.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: USERS_PER_PAGE,
        }
    }
}

/// A page of items plus paging metadata
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Convert the page items, keeping the metadata
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Slices an ordered collection into pages.
pub trait Paginator<T>: Send + Sync {
    fn paginate(&self, items: Vec<T>, params: &PaginationParams) -> Paginated<T>;
}

/// In-memory offset/limit paginator.
///
/// Pages past the end are empty; they are not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetPaginator;

impl<T: Send> Paginator<T> for OffsetPaginator {
    fn paginate(&self, items: Vec<T>, params: &PaginationParams) -> Paginated<T> {
        let total = items.len() as u64;
        let limit = params.limit();
        let data: Vec<T> = items
            .into_iter()
            .skip(usize::try_from(params.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Paginated::new(data, params.page, limit, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: u64, page: u64) -> Paginated<u64> {
        let items: Vec<u64> = (0..total).collect();
        OffsetPaginator.paginate(items, &PaginationParams::new(page, USERS_PER_PAGE))
    }

    #[test]
    fn test_first_page_is_full() {
        let page = page_of(25, 1);

        assert_eq!(page.data, (0..10).collect::<Vec<_>>());
        assert_eq!(page.meta.total, 25);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[test]
    fn test_last_page_is_partial() {
        let page = page_of(25, 3);
        assert_eq!(page.data, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = page_of(25, 4);

        assert!(page.is_empty());
        assert_eq!(page.meta.page, 4);
        assert_eq!(page.meta.total, 25);
    }

    #[test]
    fn test_huge_page_numbers_are_empty() {
        for page in [u64::MAX, (1u64 << 63) + 1] {
            let result = page_of(25, page);

            assert!(result.is_empty(), "page {} should be empty", page);
            assert_eq!(result.meta.page, page);
            assert_eq!(result.meta.total, 25);
        }
    }

    #[test]
    fn test_offset_saturates() {
        let params = PaginationParams::new(u64::MAX, USERS_PER_PAGE);
        assert_eq!(params.offset(), u64::MAX);
    }

    #[test]
    fn test_empty_collection() {
        let page = page_of(0, 1);

        assert!(page.is_empty());
        assert_eq!(page.meta.total_pages, 0);
    }

    #[test]
    fn test_limit_capped() {
        let params = PaginationParams::new(2, 1_000);

        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::default());
        assert_eq!(params.per_page, USERS_PER_PAGE);
    }

    #[test]
    fn test_map_keeps_meta() {
        let page = page_of(25, 2).map(|n| n.to_string());

        assert_eq!(page.data.first().map(String::as_str), Some("10"));
        assert_eq!(page.meta.page, 2);
    }
}
