//! Errors produced by API client operations.

/// Message used when a failed response carries no `message` field.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The body was not JSON, or not the JSON shape the endpoint promises.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A caller-supplied header could not be encoded.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// List filters could not be encoded as a query string.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A refresh was requested but the session holds no refresh token.
    #[error("no refresh token stored")]
    MissingRefreshToken,
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials on this request.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for ApiError {
    fn from(e: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(e.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for ApiError {
    fn from(e: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(e.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for ApiError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        Self::InvalidQuery(e.to_string())
    }
}
