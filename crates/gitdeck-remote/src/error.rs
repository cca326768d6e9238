//! Error types for gitdeck-remote.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the Git service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backend rejected the credentials.
    #[error("authentication with the workspace backend failed")]
    AuthenticationFailed,

    /// Token not found.
    #[error("no backend token found - set the configured token variable")]
    NoToken,

    /// Backend answered with a non-success status.
    #[error("backend error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Network error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse backend response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// The message to show a user, without transport decoration.
    ///
    /// Backend errors carry their own `msg`; everything else falls back to
    /// the display form.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_is_backend_text() {
        let err = Error::Remote {
            status: 409,
            message: "branch exists".into(),
        };
        assert_eq!(err.message(), "branch exists");
        assert_eq!(err.to_string(), "backend error (409): branch exists");
    }

    #[test]
    fn test_other_message_uses_display() {
        assert_eq!(
            Error::NoToken.message(),
            "no backend token found - set the configured token variable"
        );
    }
}
