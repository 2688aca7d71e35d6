/// Convenience result type used across Rewind.
pub type RewindResult<T> = Result<T, RewindError>;

/// Top-level error taxonomy used by renderer and converter APIs.
#[derive(thiserror::Error, Debug)]
pub enum RewindError {
    /// The top-level recap input could not be read or parsed.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid user-provided data (paths, sizes, dimensions).
    #[error("validation error: {0}")]
    Validation(String),

    /// An image asset could not be resolved or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A font could not be loaded or used for layout.
    #[error("font error: {0}")]
    Font(String),

    /// Errors while rasterizing or encoding the output image.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RewindError {
    /// Build a [`RewindError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`RewindError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RewindError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`RewindError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`RewindError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RewindError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RewindError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
