//! # API Response Types
//!
//! Error body and page wrapper shared by every endpoint.
//!
//! ## Response Format
//!
//! ```json
//! { "status": "error", "code": "CONFLICT", "message": "..." }
//! { "items": [ ... ], "meta": { "page": 1, "per_page": 20, ... } }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u64,

    /// Number of items per page.
    pub per_page: u64,

    /// Total number of items.
    pub total_items: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Has next page.
    pub has_next: bool,

    /// Has previous page.
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Maximum allowed page number.
    const MAX_PAGE: u64 = 1_000_000;

    /// Create a new pagination meta.
    ///
    /// `page` is clamped into `1..=MAX_PAGE`; a zero `per_page` is treated as one.
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = page.clamp(1, Self::MAX_PAGE);
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page);

        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A page of list results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta:  PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total_items: u64) -> Self {
        Self {
            items,
            meta: PaginationMeta::new(page, per_page, total_items),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Always `"error"`.
    pub status: String,

    /// Machine readable error code.
    pub code: String,

    /// Human readable message.
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl ToString, message: impl ToString) -> Self {
        Self {
            status:  "error".to_string(),
            code:    code.to_string(),
            message: message.to_string(),
        }
    }
}
