//! Error translation for the event API.
//!
//! Non-success responses are captured as an [`ApiError`] holding the status
//! code and the start of the response body, then folded into
//! [`BoardError::Api`].

use std::fmt;

use crate::error::BoardError;

/// Maximum number of characters of a response body kept in an error message
const BODY_EXCERPT_LEN: usize = 200;

/// Error returned by the event API
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<reqwest::StatusCode>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with HTTP status information.
    pub fn with_status(message: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build an error from a non-success response, consuming its body.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let excerpt = body_excerpt(&body);

        let message = if excerpt.is_empty() {
            format!("{url} returned {status}")
        } else {
            format!("{url} returned {status}: {excerpt}")
        };
        Self::with_status(message, status)
    }

    /// Whether the server reported that the record does not exist
    pub fn is_not_found(&self) -> bool {
        self.status == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for BoardError {
    fn from(error: ApiError) -> Self {
        BoardError::Api(error.message)
    }
}

/// Collapse whitespace and truncate a response body for display
fn body_excerpt(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= BODY_EXCERPT_LEN {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(BODY_EXCERPT_LEN).collect();
    format!("{truncated}...")
}
