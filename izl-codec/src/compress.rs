//! DEFLATE/zlib helpers shared by every generation

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use izl_format::constants::ZLIB_HEADER;
use izl_format::{IzlError, Limits, Result};

/// Inflate a zlib stream, or a raw DEFLATE stream when the zlib header is missing.
pub fn inflate(bytes: &[u8], limits: &Limits) -> Result<Vec<u8>> {
    if bytes.first() == Some(&ZLIB_HEADER) {
        inflate_zlib(bytes, limits)
    } else {
        inflate_raw(bytes, limits)
    }
}

/// Inflate a zlib-wrapped stream
pub fn inflate_zlib(bytes: &[u8], limits: &Limits) -> Result<Vec<u8>> {
    read_bounded(ZlibDecoder::new(bytes), limits, "zlib")
}

/// Inflate a raw DEFLATE stream
pub fn inflate_raw(bytes: &[u8], limits: &Limits) -> Result<Vec<u8>> {
    read_bounded(DeflateDecoder::new(bytes), limits, "deflate")
}

fn read_bounded<R: Read>(reader: R, limits: &Limits, kind: &str) -> Result<Vec<u8>> {
    let cap = limits.max_inflated_len as u64;
    let mut out = Vec::new();
    reader
        .take(cap + 1)
        .read_to_end(&mut out)
        .map_err(|e| IzlError::Decompress(format!("{} inflate failed: {}", kind, e)))?;
    if out.len() as u64 > cap {
        return Err(IzlError::LimitExceeded(format!(
            "inflated body exceeds {} bytes",
            cap
        )));
    }
    Ok(out)
}

/// zlib-compress at maximum level
pub fn deflate_best(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
