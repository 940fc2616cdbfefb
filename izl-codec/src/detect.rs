//! Generation detection
//!
//! Detection only looks at prefixes; it never decodes. The result is matched in
//! [`crate::decode_with_limits`] to pick a decoder.

use std::fmt;

use izl_format::constants::{
    FILE_MAGIC, TEXT_PREFIX_V2, TEXT_PREFIX_V3, V1_BASE64_PREFIXES, V1_SCREENSHOT_SEP,
    ZLIB_HEADER,
};
use izl_format::{IzlError, Result};
use serde::Serialize;

/// Wire format generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatVersion {
    /// Original base64 JSON with optional screenshot
    V1,
    /// Compressed legacy delimiter text
    V2,
    /// "IZL3": compressed msgpack with integer keys
    V3,
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::V1 => f.write_str("v1"),
            FormatVersion::V2 => f.write_str("v2"),
            FormatVersion::V3 => f.write_str("v3"),
        }
    }
}

/// How the payload is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Framing {
    /// Raw bytes (magic-tagged, zlib, or raw DEFLATE)
    Binary,
    /// Prefixed text
    Text,
}

/// Detection result for a byte payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Generation the payload belongs to
    pub version: FormatVersion,
    /// Carrier of the body
    pub framing: Framing,
}

/// Detect the generation of a text payload.
///
/// Fails with [`IzlError::UnknownFormat`] when no prefix matches.
pub fn detect_str(text: &str) -> Result<FormatVersion> {
    let text = text.trim();
    if text.starts_with(TEXT_PREFIX_V3) {
        Ok(FormatVersion::V3)
    } else if text.starts_with(TEXT_PREFIX_V2) {
        Ok(FormatVersion::V2)
    } else if text.contains(V1_SCREENSHOT_SEP)
        || V1_BASE64_PREFIXES
            .iter()
            .any(|prefix| text.starts_with(prefix))
    {
        Ok(FormatVersion::V1)
    } else {
        Err(IzlError::UnknownFormat)
    }
}

/// Detect the generation of a byte payload. Total: unknown bytes are assumed to
/// be a raw DEFLATE legacy body.
pub fn detect_bytes(bytes: &[u8]) -> Detection {
    if bytes.starts_with(&FILE_MAGIC) {
        return Detection {
            version: FormatVersion::V3,
            framing: Framing::Binary,
        };
    }
    if bytes.first() == Some(&ZLIB_HEADER) {
        return Detection {
            version: FormatVersion::V2,
            framing: Framing::Binary,
        };
    }
    if let Some(version) = std::str::from_utf8(bytes)
        .ok()
        .and_then(|text| detect_str(text).ok())
    {
        return Detection {
            version,
            framing: Framing::Text,
        };
    }
    Detection {
        version: FormatVersion::V2,
        framing: Framing::Binary,
    }
}
