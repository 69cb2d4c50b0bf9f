/// Convenience result type used across homewidget.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Failures of the thumbnail decoder.
///
/// These are the only errors `decode_and_fit` can produce. Missing the byte budget after the
/// quality floor is not an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not valid base64.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The payload decoded but the bytes are not a recognized image.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level error taxonomy used by the widget APIs.
#[derive(thiserror::Error, Debug)]
pub enum WidgetError {
    /// Invalid caller-provided values (canvas size, budget, store contents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing.
    #[error("render error: {0}")]
    Render(String),

    /// Thumbnail decoding failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Errors when serializing or deserializing the preference store.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WidgetError {
    /// Build a [`WidgetError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WidgetError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`WidgetError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
