use thiserror::Error;

/// Failures surfaced by the portal backend.
///
/// There is no retry or recovery path here: callers report the failure
/// (usually as a toast) and carry on with whatever data they have.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body-decoding failure from the HTTP layer.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the bearer token (or none was sent).
    #[error("authentication required")]
    Unauthorized,

    /// Non-success status with whatever the server put in the body.
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The response parsed but did not contain what we needed.
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Short human-readable form for toasts and form error lines.
    pub fn brief(&self) -> String {
        match self {
            ApiError::Transport(e) => {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    "cannot reach the server".to_string()
                } else {
                    "request failed".to_string()
                }
            }
            ApiError::Unauthorized => "authentication required".to_string(),
            ApiError::Http { status, .. } => format!("server error ({status})"),
            ApiError::Unexpected(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_http_carries_status() {
        let err = ApiError::Http {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.brief(), "server error (502)");
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn brief_unauthorized() {
        assert_eq!(ApiError::Unauthorized.brief(), "authentication required");
    }
}
