use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unknown API key.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// No matching record inside the requesting tenant.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record was found but lacks a reference it must carry.
    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A server-side failure tagged with the operation that was running.
    ///
    /// `expose_cause` controls whether the cause is returned to the caller
    /// as `details` or only logged.
    #[error("{message}: {cause}")]
    Operation {
        message: String,
        cause: String,
        expose_cause: bool,
    },
}

impl AppError {
    /// Tag storage/internal failures with a caller-facing operation message.
    ///
    /// Auth, not-found and integrity errors keep their own message.
    pub fn during(self, message: &str) -> Self {
        self.tag(message, false)
    }

    /// Like [`AppError::during`], but the underlying cause is returned to the
    /// caller in the `details` field.
    pub fn during_with_details(self, message: &str) -> Self {
        self.tag(message, true)
    }

    fn tag(self, message: &str, expose_cause: bool) -> Self {
        match self {
            AppError::Database(cause) | AppError::Internal(cause) => AppError::Operation {
                message: message.to_string(),
                cause,
                expose_cause,
            },
            other => other,
        }
    }
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
