use crate::capture::artifact::ArtifactKind;

/// Convenience result type used across prismwarp.
pub type PrismResult<T> = Result<T, PrismError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PrismError {
    /// A preset failed to parse or violated the schema.
    #[error("malformed config: {0}")]
    MalformedConfig(String),

    /// A capture was requested while another session is armed or active.
    #[error("capture session busy: a {active} session is already in progress")]
    SessionBusy {
        /// Kind of the session currently holding the capture slot.
        active: ArtifactKind,
    },

    /// The frame sampler was read before the first completed tick.
    #[error("no frame has been rendered yet")]
    NotReady,

    /// The video or palette encoder rejected a frame or failed to finalize.
    #[error("encoder failure: {0}")]
    EncoderFailure(String),

    /// Invalid user-provided arguments outside the preset schema.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PrismError {
    /// Build a [`PrismError::MalformedConfig`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedConfig(msg.into())
    }

    /// Build a [`PrismError::EncoderFailure`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::EncoderFailure(msg.into())
    }

    /// Build a [`PrismError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
