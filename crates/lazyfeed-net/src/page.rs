//! Wire types for the pagination contract.

use serde::{Deserialize, Serialize};

use lazyfeed_core::FilterSet;

/// Pagination metadata returned by the backend alongside each page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub pages: u32,
    /// The 1-based number of this page.
    pub current: u32,
}

/// One fetch result unit: an ordered item batch plus pagination metadata.
///
/// `T` is the backend-defined row record; the engine never looks inside it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items of this page, in backend order.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Returns `true` if this page carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Parameters of one page fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items requested per page.
    pub page_size: u32,
    /// Active filter set, appended as query parameters.
    pub filters: FilterSet,
}

impl PageRequest {
    /// Create a request for the given page.
    pub fn new(page: u32, page_size: u32, filters: FilterSet) -> Self {
        Self {
            page,
            page_size,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_backend_shape() {
        let json = r#"{
            "items": [{"id": 1}, {"id": 2}],
            "pagination": {"total": 120, "pages": 3, "current": 1}
        }"#;

        let page: Page<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(page.len(), 2);
        assert!(!page.is_empty());
        assert_eq!(
            page.pagination,
            Pagination {
                total: 120,
                pages: 3,
                current: 1
            }
        );
    }

    #[test]
    fn test_empty_page() {
        let json = r#"{"items": [], "pagination": {"total": 0, "pages": 1, "current": 1}}"#;
        let page: Page<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
    }
}
