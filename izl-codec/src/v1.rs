//! Original-format decoder: base64 JSON with an optional base64 screenshot

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use izl_format::constants::{V1_SCREENSHOT_SEP, ZLIB_HEADER};
use izl_format::{IzlError, Level, Limits, Result};
use serde_json::Value;

use crate::compress::inflate_zlib;

/// Decode `<base64 json>[;<base64 image>]`.
pub(crate) fn decode_text(text: &str, limits: &Limits) -> Result<Level> {
    let (json_part, image_part) = match text.split_once(V1_SCREENSHOT_SEP) {
        Some((json, image)) => (json, Some(image)),
        None => (text, None),
    };

    let raw = STANDARD
        .decode(json_part.trim())
        .map_err(|e| IzlError::Base64(e.to_string()))?;
    let body = if raw.first() == Some(&ZLIB_HEADER) {
        inflate_zlib(&raw, limits)?
    } else {
        raw
    };

    let Value::Object(map) = serde_json::from_slice::<Value>(&body)? else {
        return Err(IzlError::Malformed(
            "original-format payload is not a JSON object".to_string(),
        ));
    };
    let mut level = Level::from_json_map(map)?;

    if let Some(image) = image_part.map(str::trim).filter(|image| !image.is_empty()) {
        level.screenshot = Some(data_url(image));
    }
    Ok(level)
}

fn data_url(image: &str) -> String {
    if image.starts_with("data:") {
        return image.to_string();
    }
    let mime = if image.starts_with("/9j/") {
        "image/jpeg"
    } else if image.starts_with("UklGR") {
        "image/webp"
    } else {
        "image/png"
    };
    format!("data:{};base64,{}", mime, image)
}
