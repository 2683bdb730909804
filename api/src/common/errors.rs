use thiserror::Error;

/// Error types for booking API operations.
///
/// Every failed call through [`crate::client::ApiClient`] resolves to one
/// of these variants. The split between [`NetworkUnreachable`] (no response
/// received at all) and [`Rejected`] (the server answered with a failure
/// status) matters downstream: session classification only ever applies to
/// rejections, and neither kind is retried automatically.
///
/// [`NetworkUnreachable`]: ApiError::NetworkUnreachable
/// [`Rejected`]: ApiError::Rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No response was received from the server (DNS, connect, timeout).
    #[error("Unable to reach server: {0}")]
    NetworkUnreachable(String),

    /// The server responded with a non-success status.
    ///
    /// `code` carries the machine-readable error code when the error body
    /// supplied one; `message` always holds something displayable, falling
    /// back to a generic status-based string when the body had none.
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The server responded with success but the body could not be decoded.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The request could not be constructed locally.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of the failure, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code supplied by the server, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for direct display to the user.
    ///
    /// Server-supplied text is preferred; transport failures map to the
    /// connectivity wording the rest of the application standardizes on.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkUnreachable(_) => {
                "Unable to connect to server. Please check your internet connection.".to_string()
            }
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::InvalidResponse(_) => {
                "The server returned an unexpected response. Please try again.".to_string()
            }
            ApiError::InvalidRequest(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_unreachable_uses_connectivity_wording() {
        let err = ApiError::NetworkUnreachable("connection refused".to_string());
        assert_eq!(
            err.user_message(),
            "Unable to connect to server. Please check your internet connection."
        );
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn rejected_exposes_status_and_code() {
        let err = ApiError::Rejected {
            status: 401,
            code: Some("TOKEN_EXPIRED".to_string()),
            message: "Token has expired".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.code(), Some("TOKEN_EXPIRED"));
        assert_eq!(err.user_message(), "Token has expired");
    }
}
