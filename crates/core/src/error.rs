use crate::template::TemplateError;

/// Message shared by every access-denied outcome so that hidden, disabled
/// and missing entities are indistinguishable to the caller.
pub const NOT_FOUND_MESSAGE: &str =
    "This resource doesn't exist or is disabled or you don't have access to it";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTemplate(#[from] TemplateError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The canonical not-found error for entity and relation access checks.
    pub fn not_found() -> Self {
        CoreError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    /// Stable machine-readable code, used as the `code` field of error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::InvalidTemplate(_) | CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Upstream(_) => "UPSTREAM_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the surrounding request layer should report a server-side
    /// failure (5xx) rather than a client error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, CoreError::Upstream(_) | CoreError::Internal(_))
    }
}
