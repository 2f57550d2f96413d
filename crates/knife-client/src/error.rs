use thiserror::Error;

/// Everything that can go wrong talking to the collaborator.
///
/// Controllers never propagate these past their own boundary: each one is
/// turned into a single user-visible message plus a diagnostic log record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (network unreachable, DNS, TLS).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The collaborator answered with a 4xx/5xx status.
    #[error("Server responded {status}{}", .description.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status {
        status: u16,
        /// `description` / `message` field of the error body, if present.
        description: Option<String>,
    },

    /// Success status, but the body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ClientError {
    pub fn status(status: u16, description: impl Into<String>) -> Self {
        Self::Status {
            status,
            description: Some(description.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Text to show the user for a failed action.
    ///
    /// The server's own description is surfaced verbatim when it sent one;
    /// otherwise `fallback` (e.g. "Failed to delete note") is used for
    /// status errors, and the error itself for transport/decoding faults.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                description: Some(d),
                ..
            } => d.clone(),
            Self::Status { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_description() {
        let err = ClientError::status(500, "database is locked");
        assert_eq!(err.user_message("Failed to delete note"), "database is locked");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::Status {
            status: 502,
            description: None,
        };
        assert_eq!(err.user_message("Failed to delete note"), "Failed to delete note");
        assert_eq!(err.to_string(), "Server responded 502");

        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.user_message("ignored"), "Request failed: connection refused");
    }
}
