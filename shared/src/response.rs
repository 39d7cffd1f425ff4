//! API Response types
//!
//! The backend wraps every payload in the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "data": { ... },
//!     "message": "Employee created successfully"
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Unified API response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend accepted the request
    pub success: bool,
    /// Response data (`null` for deletes and failures)
    #[serde(default = "none")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self::ok_with_message(data, "Success")
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Message if the backend sent a non-blank one
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

impl ApiResponse<()> {
    /// Successful response without data (deletes)
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_data_parses() {
        let resp: ApiResponse<()> =
            serde_json::from_str(r#"{"success":true,"data":null,"message":"Employee deleted successfully"}"#)
                .unwrap();
        assert!(resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.message(), Some("Employee deleted successfully"));
    }

    #[test]
    fn test_missing_fields_default() {
        let resp: ApiResponse<Vec<i64>> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert!(resp.message().is_none());
    }

    #[test]
    fn test_blank_message_is_ignored() {
        let resp = ApiResponse::<i64>::error("  ");
        assert!(resp.message().is_none());
    }
}
