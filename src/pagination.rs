//! Page/limit parsing and pagination metadata.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 15;

/// Raw `page` / `limit` query parameters.
///
/// Kept as strings so that malformed values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Server-side paging knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub default_limit: u64,
    /// Upper bound on `limit`. `None` leaves it unbounded.
    pub max_limit: Option<u64>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
        }
    }
}

/// A validated page request. Both fields are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

/// Skip/limit pair handed to the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<u64>,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Build a request from query parameters, falling back to defaults for
    /// absent, non-numeric or zero values.
    pub fn from_query(query: &PageQuery, settings: &PageSettings) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(DEFAULT_PAGE);
        let mut limit = query
            .limit
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(settings.default_limit.max(1));
        if let Some(max) = settings.max_limit {
            limit = limit.min(max.max(1));
        }
        Self { page, limit }
    }

    pub fn window(&self) -> Window {
        Window {
            skip: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }

    pub fn paginate(&self, total: u64) -> Pagination {
        let pages = total.div_ceil(self.limit);
        Pagination {
            page: self.page,
            limit: self.limit,
            pages,
            total,
            next: (self.page < pages).then(|| self.page + 1),
            prev: (self.page > 1).then(|| self.page - 1),
        }
    }
}

/// Parse the leading decimal digits of `raw`, ignoring trailing garbage
/// (`"2abc"` is 2). Zero and digit-less input yield `None`.
fn parse_positive(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<u64>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_middle_page() {
        let p = PageRequest::new(2, 15).paginate(40);
        assert_eq!(p.pages, 3);
        assert_eq!(p.next, Some(3));
        assert_eq!(p.prev, Some(1));
    }

    #[test]
    fn test_single_page() {
        let p = PageRequest::new(1, 15).paginate(10);
        assert_eq!(p.pages, 1);
        assert_eq!(p.next, None);
        assert_eq!(p.prev, None);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let p = PageRequest::new(1, 15).paginate(0);
        assert_eq!(p.pages, 0);
        assert_eq!(p.next, None);
        assert_eq!(p.prev, None);
    }

    #[test]
    fn test_page_past_the_end_still_links_back() {
        let p = PageRequest::new(5, 10).paginate(12);
        assert_eq!(p.pages, 2);
        assert_eq!(p.next, None);
        assert_eq!(p.prev, Some(4));
    }

    #[test]
    fn test_metadata_is_consistent() {
        for total in 0..60u64 {
            for limit in 1..8u64 {
                for page in 1..12u64 {
                    let p = PageRequest::new(page, limit).paginate(total);
                    assert_eq!(p.pages, (total + limit - 1) / limit);
                    assert_eq!(p.next.is_some(), page < p.pages);
                    assert_eq!(p.prev.is_some(), page > 1);
                }
            }
        }
    }

    #[test]
    fn test_window_offset() {
        assert_eq!(
            PageRequest::new(1, 15).window(),
            Window { skip: 0, limit: 15 }
        );
        assert_eq!(
            PageRequest::new(3, 20).window(),
            Window { skip: 40, limit: 20 }
        );
    }

    #[test]
    fn test_query_defaults() {
        let settings = PageSettings::default();
        assert_eq!(
            PageRequest::from_query(&query(None, None), &settings),
            PageRequest { page: 1, limit: 15 }
        );
        assert_eq!(
            PageRequest::from_query(&query(Some("abc"), Some("")), &settings),
            PageRequest { page: 1, limit: 15 }
        );
        assert_eq!(
            PageRequest::from_query(&query(Some("0"), Some("0")), &settings),
            PageRequest { page: 1, limit: 15 }
        );
    }

    #[test]
    fn test_query_parses_leading_digits() {
        let settings = PageSettings::default();
        assert_eq!(
            PageRequest::from_query(&query(Some("3"), Some("25")), &settings),
            PageRequest { page: 3, limit: 25 }
        );
        assert_eq!(
            PageRequest::from_query(&query(Some("2abc"), Some(" 7 ")), &settings),
            PageRequest { page: 2, limit: 7 }
        );
        assert_eq!(
            PageRequest::from_query(&query(Some("-2"), None), &settings),
            PageRequest { page: 1, limit: 15 }
        );
    }

    #[test]
    fn test_limit_is_unbounded_by_default() {
        let settings = PageSettings::default();
        let req = PageRequest::from_query(&query(None, Some("100000")), &settings);
        assert_eq!(req.limit, 100_000);
    }

    #[test]
    fn test_limit_cap_applies_when_configured() {
        let settings = PageSettings {
            default_limit: 15,
            max_limit: Some(100),
        };
        let req = PageRequest::from_query(&query(None, Some("5000")), &settings);
        assert_eq!(req.limit, 100);
    }

    #[test]
    fn test_absent_cursors_are_omitted_from_json() {
        let json = serde_json::to_value(PageRequest::new(1, 15).paginate(3)).unwrap();
        assert!(json.get("next").is_none());
        assert!(json.get("prev").is_none());
        assert_eq!(json["pages"], 1);
        assert_eq!(json["total"], 3);
    }
}
