//! Error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// `{"error": "...", "status": 404}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable explanation.
    pub error: String,

    /// The HTTP status code.
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::new(404, "Post missing")).unwrap();

        assert_eq!(body, serde_json::json!({"error": "Post missing", "status": 404}));
    }
}
