//! Page-number pagination shared by every list endpoint.
//!
//! Pages are 1-based. A page past the end is an empty page, not an error, so
//! clients can walk `next` links without special-casing the tail.

use axum::http::Uri;
use serde::Serialize;

use crate::error::{ApiError, Result};

const PAGE_PARAM: &str = "page";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    /// Parse the `page` query parameter. Absent or empty means page 1.
    pub fn from_query(raw: Option<&str>, size: u32) -> Result<Self> {
        let number = match raw.map(str::trim) {
            None | Some("") => 1,
            Some(s) => s
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| ApiError::validation(PAGE_PARAM, "Invalid page."))?,
        };
        Ok(Self {
            number,
            size: size.max(1),
        })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }
}

/// Number of pages for `count` items. An empty result still has one page.
pub fn page_count(count: i64, size: u32) -> u32 {
    let size = i64::from(size.max(1));
    let pages = (count.max(0) + size - 1) / size;
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, request: PageRequest, uri: &Uri) -> Self {
        let last = page_count(count, request.size);
        let next = (request.number < last).then(|| page_link(uri, request.number + 1));
        let previous =
            (request.number > 1).then(|| page_link(uri, (request.number - 1).min(last)));
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Rebuild the request URI with `page` set. Page 1 drops the parameter.
fn page_link(uri: &Uri, page: u32) -> String {
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(PAGE_PARAM))
        .map(str::to_string)
        .collect();
    if page > 1 {
        params.push(format!("{}={}", PAGE_PARAM, page));
    }

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn page_defaults_to_first() {
        let page = PageRequest::from_query(None, 10).unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.offset(), 0);
        assert_eq!(PageRequest::from_query(Some(""), 10).unwrap().number, 1);
    }

    #[test]
    fn rejects_non_positive_pages() {
        assert!(PageRequest::from_query(Some("0"), 10).is_err());
        assert!(PageRequest::from_query(Some("-1"), 10).is_err());
        assert!(PageRequest::from_query(Some("two"), 10).is_err());
    }

    #[test]
    fn offset_follows_page_number() {
        let page = PageRequest::from_query(Some("3"), 10).unwrap();
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn counts_pages_with_partial_tail() {
        assert_eq!(page_count(21, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(0, 10), 1);
    }

    #[test]
    fn links_on_middle_page() {
        let request = PageRequest::from_query(Some("2"), 10).unwrap();
        let page = Page::new(vec![0; 10], 21, request, &uri("/transactions?page=2"));
        assert_eq!(page.next.as_deref(), Some("/transactions?page=3"));
        assert_eq!(page.previous.as_deref(), Some("/transactions"));
    }

    #[test]
    fn links_keep_filters() {
        let request = PageRequest::from_query(Some("1"), 10).unwrap();
        let page = Page::new(
            vec![0; 10],
            25,
            request,
            &uri("/transactions?min_amount=10&page=1&max_amount=18.5"),
        );
        assert_eq!(
            page.next.as_deref(),
            Some("/transactions?min_amount=10&max_amount=18.5&page=2")
        );
        assert_eq!(page.previous, None);
    }

    #[test]
    fn last_page_has_no_next() {
        let request = PageRequest::from_query(Some("3"), 10).unwrap();
        let page = Page::new(vec![0], 21, request, &uri("/wallets?page=3"));
        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/wallets?page=2"));
    }

    #[test]
    fn page_past_the_end_points_back_to_last() {
        let request = PageRequest::from_query(Some("4"), 10).unwrap();
        let page: Page<i32> = Page::new(vec![], 21, request, &uri("/wallets?page=4"));
        assert_eq!(page.count, 21);
        assert!(page.results.is_empty());
        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/wallets?page=3"));
    }

    #[test]
    fn empty_result_is_a_single_page() {
        let request = PageRequest::from_query(None, 10).unwrap();
        let page: Page<i32> = Page::new(vec![], 0, request, &uri("/wallets"));
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }
}
