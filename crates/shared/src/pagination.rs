//! Offset pagination utilities.

use serde::{Deserialize, Serialize};

/// Default page size when a client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Zero-based page request as accepted from query strings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }.normalized()
    }

    /// Clamps the size into `1..=MAX_PAGE_SIZE`.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row limit for SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// A single page of results plus totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
    pub last: bool,
}

impl<T> PageResponse<T> {
    /// Builds a page. An empty result still reports one (empty) page.
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let total_pages = total_pages(total_elements, request.size);
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            last: request.page.saturating_add(1) >= total_pages,
        }
    }

    /// Converts the items while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> PageResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PageResponse {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last: self.last,
        }
    }
}

fn total_pages(total_elements: i64, size: u32) -> u32 {
    if total_elements <= 0 || size == 0 {
        return 1;
    }
    let size = i64::from(size);
    let pages = (total_elements + size - 1) / size;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest::new(3, 20);
        assert_eq!(request.offset(), 60);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 10_000).size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_request_from_query_json() {
        let request: PageRequest = serde_json::from_str(r#"{"page": 2}"#).unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_empty_page_reports_single_last_page() {
        let page: PageResponse<i32> = PageResponse::new(vec![], PageRequest::new(0, 10), 0);
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.last);
    }

    #[test]
    fn test_first_of_two_pages_is_not_last() {
        let page = PageResponse::new((0..5).collect(), PageRequest::new(0, 5), 10);
        assert_eq!(page.total_pages, 2);
        assert!(!page.last);
    }

    #[test]
    fn test_partial_last_page() {
        let page = PageResponse::new(vec![1], PageRequest::new(2, 5), 11);
        assert_eq!(page.total_pages, 3);
        assert!(page.last);
    }

    #[test]
    fn test_page_far_past_the_end_is_last() {
        let page: PageResponse<i32> = PageResponse::new(vec![], PageRequest::new(u32::MAX, 10), 5);
        assert_eq!(page.page, u32::MAX);
        assert_eq!(page.total_pages, 1);
        assert!(page.last);
        assert_eq!(PageRequest::new(u32::MAX, 10).offset(), i64::from(u32::MAX) * 10);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = PageResponse::new(vec![1, 2], PageRequest::new(0, 2), 4);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.content, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.total_pages, 2);
        assert!(!mapped.last);
    }

    #[test]
    fn test_serializes_camel_case() {
        let page = PageResponse::new(vec![1], PageRequest::new(0, 10), 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["last"], true);
    }
}
