/// Convenience result type used across randart.
pub type RandArtResult<T> = Result<T, RandArtError>;

/// Top-level error taxonomy used by generation APIs.
///
/// Low image diversity is not an error: the quality gate retries and then degrades to the
/// last image with a warning.
#[derive(thiserror::Error, Debug)]
pub enum RandArtError {
    /// Invalid caller-provided size or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures while setting up or running a raster pass.
    #[error("render error: {0}")]
    Render(String),

    /// The caller cancelled the generation through a [`CancelToken`](crate::CancelToken).
    #[error("generation cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RandArtError {
    /// Build a [`RandArtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RandArtError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
