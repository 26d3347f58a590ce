//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated, 1-indexed page of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Create a page request from optional query values, falling back to the
    /// defaults in `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if `page` or `per_page` is zero, or
    /// if `per_page` is larger than [PaginationConfig::max_page_size].
    /// Out of range values are rejected rather than clamped.
    pub fn new(
        page: Option<u64>,
        per_page: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = page.unwrap_or(config.default_page);
        let per_page = per_page.unwrap_or(config.default_page_size);

        if page < 1 {
            return Err(Error::InvalidParameter(
                "page must be a positive integer".to_owned(),
            ));
        }

        if per_page < 1 {
            return Err(Error::InvalidParameter(
                "per_page must be a positive integer".to_owned(),
            ));
        }

        if per_page > config.max_page_size {
            return Err(Error::InvalidParameter(format!(
                "per_page must be at most {}",
                config.max_page_size
            )));
        }

        Ok(Self { page, per_page })
    }

    /// The 1-indexed page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The maximum number of items on the page.
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// The number of items that come before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Take the items for this page from `items`.
    ///
    /// A page past the end yields an empty vector.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.per_page).unwrap_or(usize::MAX);

        items.iter().skip(start).take(len).cloned().collect()
    }
}

/// The number of pages needed to show `item_count` items `per_page` at a time.
pub fn page_count(item_count: u64, per_page: u64) -> u64 {
    item_count.div_ceil(per_page.max(1))
}
