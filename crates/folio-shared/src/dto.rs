//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Query string of `GET /api/v1/posts`.
///
/// Paging values are kept as raw strings so that unparsable input falls back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListPostsQuery {
    pub fn page(&self) -> Option<i64> {
        parse_lenient(self.page.as_deref())
    }

    pub fn limit(&self) -> Option<i64> {
        parse_lenient(self.limit.as_deref())
    }
}

fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}
