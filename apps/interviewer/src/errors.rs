use thiserror::Error;

/// Failure of a call to the remote interview service.
///
/// Controllers never propagate this to the user: every variant is absorbed
/// and replaced with local fallback content.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A required wizard field is missing. Reported by disabling the forward
/// action, never raised to the caller as a hard failure.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Interview type has not been chosen")]
    MissingType,

    #[error("Institution is empty")]
    EmptyInstitution,

    #[error("No field has been selected")]
    MissingField,
}
