/// Crate-wide result alias.
pub type NovaResult<T> = Result<T, NovaError>;

/// Errors surfaced by synthesis, rendering and capture.
///
/// None of these are fatal to the process: the composer records them as a user-visible message
/// and stays ready for another attempt.
#[derive(thiserror::Error, Debug)]
pub enum NovaError {
    /// Request rejected before synthesis (empty prompt, duration out of range under `Reject`).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The capture/encoding capability is missing from this runtime.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// The drawing surface could not be created.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The encoding sink failed while being set up. The message is kept verbatim.
    #[error("unable to initialise encoder: {0}")]
    EncoderInit(String),

    /// Internal consistency check failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Runtime failure while rendering or encoding.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NovaError {
    /// Build [`NovaError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build [`NovaError::UnsupportedEnvironment`].
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedEnvironment(msg.into())
    }

    /// Build [`NovaError::SurfaceUnavailable`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build [`NovaError::EncoderInit`].
    pub fn encoder_init(msg: impl Into<String>) -> Self {
        Self::EncoderInit(msg.into())
    }

    /// Build [`NovaError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`NovaError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
