//! # API Response Types
//!
//! Generic API response types for the Praxis application.
//! Provides a consistent response format for all API endpoints.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "success": true,
//!   "data": { ... },
//!   "pagination": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page:        u64,
    /// Number of items per page.
    pub per_page:    u64,
    /// Total number of items.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Largest accepted page size; anything above is clamped.
    pub const MAX_PER_PAGE: u64 = 100;

    /// Create pagination metadata, normalizing out-of-range inputs.
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.clamp(1, Self::MAX_PER_PAGE);
        let total_pages = total_items.div_ceil(per_page);

        Self {
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// Zero-based offset for the current page.
    #[must_use]
    pub fn offset(&self) -> u64 { (self.page - 1) * self.per_page }
}

/// Generic success envelope wrapping a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a success envelope.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success:    true,
            data:       Some(data),
            pagination: None,
        }
    }

    /// Wrap a paginated payload in a success envelope.
    #[must_use]
    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            success:    true,
            data:       Some(data),
            pagination: Some(pagination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta_basic() {
        let meta = PaginationMeta::new(2, 25, 120);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.per_page, 25);
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.offset(), 25);
    }

    #[test]
    fn test_pagination_meta_clamps_inputs() {
        let meta = PaginationMeta::new(0, 0, 10);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.per_page, 1);

        let meta = PaginationMeta::new(1, 10_000, 10);
        assert_eq!(meta.per_page, PaginationMeta::MAX_PER_PAGE);
    }

    #[test]
    fn test_pagination_meta_empty_set() {
        let meta = PaginationMeta::new(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn test_api_response_ok() {
        let resp = ApiResponse::ok(vec![1, 2, 3]);
        assert!(resp.success);
        assert_eq!(resp.data, Some(vec![1, 2, 3]));
        assert!(resp.pagination.is_none());
    }

    #[test]
    fn test_api_response_paginated_serializes() {
        let resp = ApiResponse::paginated(vec!["a"], PaginationMeta::new(1, 20, 1));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["total_items"], 1);
    }
}
