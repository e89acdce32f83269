//! Error types for identity gateway operations.

use thiserror::Error;

/// Result type alias for identity gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures reported by the identity gateway.
///
/// Errors travel inside session actions, so every variant carries owned,
/// cloneable data and renders a message fit for a single form banner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    // ═══════════════════════════════════════════════════════════
    // Backend Rejections
    // ═══════════════════════════════════════════════════════════

    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend's `error` field, or the operation's
    /// fallback when the body carried none.
    #[error("{message}")]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Human-readable message
        message: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Client-Side Failures
    // ═══════════════════════════════════════════════════════════

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// A success response did not have the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The configured API origin could not be turned into a request URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// Build an authentication failure.
    #[must_use]
    pub fn authentication(status: u16, message: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            message: message.into(),
        }
    }

    /// Whether the backend itself rejected the request.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_displays_backend_message_verbatim() {
        let error = GatewayError::authentication(401, "Invalid credentials");
        assert_eq!(error.to_string(), "Invalid credentials");
        assert!(error.is_authentication());
        assert_eq!(error.status(), Some(401));
    }

    #[test]
    fn transport_errors_have_no_status() {
        let error = GatewayError::Transport("connection refused".to_string());
        assert!(!error.is_authentication());
        assert_eq!(error.status(), None);
        assert_eq!(error.to_string(), "Network error: connection refused");
    }
}
