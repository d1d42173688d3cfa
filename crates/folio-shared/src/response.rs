//! Standardized API response envelopes.

use serde::{Deserialize, Serialize};

use crate::dto::Pagination;

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// A page of items plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
            pagination,
        }
    }
}

/// Uniform error body: `{code, message, details?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The HTTP status code.
    pub code: u16,

    /// A short, human-readable summary.
    pub message: String,

    /// Extra context for this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_omits_missing_details() {
        let body = serde_json::to_value(ErrorResponse::not_found("blog post with slug 'x' not found")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": 404, "message": "blog post with slug 'x' not found"})
        );
    }

    #[test]
    fn error_body_includes_details_when_set() {
        let body = serde_json::to_value(
            ErrorResponse::bad_request("Invalid form data").with_details("missing boundary"),
        )
        .unwrap();
        assert_eq!(body["details"], "missing boundary");
        assert_eq!(body["code"], 400);
    }
}
