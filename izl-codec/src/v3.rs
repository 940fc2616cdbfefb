//! "IZL3" decoder: DEFLATE-wrapped msgpack with integer keys

use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use izl_format::constants::ZLIB_HEADER;
use izl_format::lfpack::unpack;
use izl_format::{Field, IzlError, Level, Limits, Result, Scope};
use rmpv::Value as MsgValue;
use serde_json::{Map, Value};
use tracing::debug;

use crate::compress::inflate_zlib;
use crate::msgpack::{key_text, to_json};

/// Decode the base64 text that follows the `|` prefix.
pub(crate) fn decode_text(body: &str, limits: &Limits) -> Result<Level> {
    let bytes = STANDARD
        .decode(body.trim())
        .map_err(|e| IzlError::Base64(e.to_string()))?;
    decode_body(&bytes, limits)
}

/// Decode a body with the magic already stripped.
pub(crate) fn decode_body(body: &[u8], limits: &Limits) -> Result<Level> {
    let raw = unwrap_body(body, limits)?;
    let mut cursor: &[u8] = &raw;
    let value =
        rmpv::decode::read_value(&mut cursor).map_err(|e| IzlError::MessagePack(e.to_string()))?;
    level_from_msgpack(value, limits)
}

/// Inflate a zlib body; bodies that are not zlib are taken as already decoded.
fn unwrap_body<'a>(body: &'a [u8], limits: &Limits) -> Result<Cow<'a, [u8]>> {
    if body.first() == Some(&ZLIB_HEADER) {
        match inflate_zlib(body, limits) {
            Ok(inflated) => return Ok(Cow::Owned(inflated)),
            Err(err @ IzlError::LimitExceeded(_)) => return Err(err),
            Err(err) => debug!(%err, "IZL3 body did not inflate, reading it as msgpack"),
        }
    }
    Ok(Cow::Borrowed(body))
}

/// Field name for a map key: table codes are reversed, anything else keeps its text.
fn field_key(key: &MsgValue) -> Result<String> {
    if let MsgValue::Integer(code) = key {
        if let Some(field) = code.as_u64().and_then(Field::from_code) {
            return Ok(field.name().to_string());
        }
    }
    key_text(key).ok_or_else(|| IzlError::Malformed(format!("unsupported map key {}", key)))
}

fn level_from_msgpack(value: MsgValue, limits: &Limits) -> Result<Level> {
    let MsgValue::Map(entries) = value else {
        return Err(IzlError::Malformed("IZL3 body is not a map".to_string()));
    };

    let mut fields = Map::new();
    for (key, value) in entries {
        let name = field_key(&key)?;
        let value = match Field::from_name(&name).filter(|f| f.scope() == Scope::Level) {
            Some(Field::Plants) => placements_from_msgpack(value, limits)?,
            Some(Field::LfValue) => flags_from_msgpack(value)?,
            _ => to_json(value),
        };
        fields.insert(name, value);
    }
    Level::from_json_map(fields)
}

fn placements_from_msgpack(value: MsgValue, limits: &Limits) -> Result<Value> {
    let MsgValue::Array(items) = value else {
        return Err(IzlError::invalid_field("plants", "expected an array"));
    };
    if items.len() > limits.max_placements {
        return Err(IzlError::LimitExceeded(format!(
            "{} placements exceeds limit {}",
            items.len(),
            limits.max_placements
        )));
    }

    items
        .into_iter()
        .map(|item| {
            let MsgValue::Map(entries) = item else {
                return Err(IzlError::invalid_field("plants", "placement is not a map"));
            };
            let mut placement = Map::new();
            for (key, value) in entries {
                placement.insert(field_key(&key)?, to_json(value));
            }
            Ok(Value::Object(placement))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn flags_from_msgpack(value: MsgValue) -> Result<Value> {
    match value {
        MsgValue::Integer(packed) => {
            let word = packed
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| IzlError::invalid_field("lfValue", "packed value out of range"))?;
            Ok(Value::from(unpack(word).to_vec()))
        }
        other => Ok(to_json(other)),
    }
}
