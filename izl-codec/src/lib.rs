//! IZL Codec - Level decoding, encoding and publication rules
//!
//! This crate provides the engines that sit on top of `izl-format`:
//!
//! - Prefix-based detection of the three wire generations
//! - One decoder per generation, all producing a canonical [`Level`]
//! - The canonical encoder (always the current "IZL3" generation)
//! - The publication validator and its configurable [`Rules`]
//!
//! Every function is synchronous and side-effect free apart from `tracing`
//! events, so callers may run them concurrently without coordination.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod coerce;
pub mod compress;
pub mod detect;
pub mod encode;
mod msgpack;
mod v1;
mod v2;
mod v3;
pub mod validate;

// Re-export commonly used types
pub use izl_format::{
    Dimension, ErrorKind, Field, IzlError, Level, LfValue, Limits, Placement, PlantRef, Result,
};

// Re-export our own types
pub use detect::{detect_bytes, detect_str, Detection, FormatVersion, Framing};
pub use encode::{encode, encode_body, encode_to_string};
pub use validate::{validate, Capacity, Rejection, Rules};

use izl_format::constants::{FILE_MAGIC, TEXT_PREFIX_V2, TEXT_PREFIX_V3};
use tracing::debug;

/// Decode a stored or uploaded byte payload of any generation.
///
/// Never fails with [`IzlError::UnknownFormat`]: bytes without a known prefix
/// are decoded as a raw DEFLATE legacy body.
pub fn decode(bytes: &[u8]) -> Result<Level> {
    decode_with_limits(bytes, &Limits::default())
}

/// [`decode`] with explicit limits.
pub fn decode_with_limits(bytes: &[u8], limits: &Limits) -> Result<Level> {
    let detection = detect_bytes(bytes);
    debug!(
        version = %detection.version,
        framing = ?detection.framing,
        len = bytes.len(),
        "decoding level bytes"
    );

    let level = match (detection.version, detection.framing) {
        (FormatVersion::V3, Framing::Binary) => v3::decode_body(&bytes[FILE_MAGIC.len()..], limits)?,
        (FormatVersion::V2, Framing::Binary) => v2::decode_binary(bytes, limits)?,
        (_, Framing::Text) | (FormatVersion::V1, Framing::Binary) => {
            let text = std::str::from_utf8(bytes).map_err(|_| IzlError::Utf8)?;
            return decode_str_with_limits(text, limits);
        }
    };
    enforce_limits(level, limits)
}

/// Decode a text payload (`|…`, `=…` or original base64 JSON).
///
/// Fails with [`IzlError::UnknownFormat`] when the prefix is not recognized.
pub fn decode_str(text: &str) -> Result<Level> {
    decode_str_with_limits(text, &Limits::default())
}

/// [`decode_str`] with explicit limits.
pub fn decode_str_with_limits(text: &str, limits: &Limits) -> Result<Level> {
    let text = text.trim();
    let version = detect_str(text)?;
    debug!(version = %version, len = text.len(), "decoding level text");

    let level = match version {
        FormatVersion::V3 => v3::decode_text(strip(text, TEXT_PREFIX_V3), limits)?,
        FormatVersion::V2 => v2::decode_text(strip(text, TEXT_PREFIX_V2), limits)?,
        FormatVersion::V1 => v1::decode_text(text, limits)?,
    };
    enforce_limits(level, limits)
}

fn strip(text: &str, prefix: char) -> &str {
    text.strip_prefix(prefix).unwrap_or(text)
}

fn enforce_limits(level: Level, limits: &Limits) -> Result<Level> {
    let count = level.placements().len();
    if count > limits.max_placements {
        return Err(IzlError::LimitExceeded(format!(
            "{} placements exceeds limit {}",
            count, limits.max_placements
        )));
    }
    Ok(level)
}
