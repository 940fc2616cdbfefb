//! Error types for IZL level handling

use thiserror::Error;

/// IZL error types
#[derive(Debug, Error)]
pub enum IzlError {
    /// Text payload matched none of the known generation prefixes.
    #[error("Unknown level data format")]
    UnknownFormat,
    /// DEFLATE/zlib stream could not be inflated.
    #[error("Decompression error: {0}")]
    Decompress(String),
    /// Base64 text could not be decoded.
    #[error("Base64 error: {0}")]
    Base64(String),
    /// MessagePack body is malformed.
    #[error("MessagePack error: {0}")]
    MessagePack(String),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Text body is not valid UTF-8.
    #[error("Level text is not valid UTF-8")]
    Utf8,
    /// A field carried a value the generation can not coerce.
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField {
        /// Wire name of the offending field
        field: String,
        /// What was wrong with it
        reason: String,
    },
    /// Body decoded but its structure is not a level.
    #[error("Malformed level: {0}")]
    Malformed(String),
    /// A configured decode limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// `lfValue` is outside the packer's contract.
    #[error("Cannot pack lfValue: {0}")]
    Packing(String),
    /// Level id is not usable as a storage key.
    #[error("Invalid level id: {0:?}")]
    InvalidLevelId(String),
    /// I/O operation failed while reading or writing level data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Payload signature not recognized
    Format,
    /// Recognized payload with a corrupt body
    Decode,
    /// Encoder handed an out-of-contract `lfValue`
    Packing,
    /// Storage failure
    Io,
}

impl IzlError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IzlError::UnknownFormat => ErrorKind::Format,
            IzlError::Packing(_) => ErrorKind::Packing,
            IzlError::Io(_) | IzlError::InvalidLevelId(_) => ErrorKind::Io,
            IzlError::Decompress(_)
            | IzlError::Base64(_)
            | IzlError::MessagePack(_)
            | IzlError::Json(_)
            | IzlError::Utf8
            | IzlError::InvalidField { .. }
            | IzlError::Malformed(_)
            | IzlError::LimitExceeded(_) => ErrorKind::Decode,
        }
    }

    /// Build an [`IzlError::InvalidField`].
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        IzlError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, IzlError>;
