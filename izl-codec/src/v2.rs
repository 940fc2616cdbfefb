//! Legacy decoder: compressed delimiter-separated text

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use izl_format::constants::{
    FIELD_SEP, LIST_SEP, PAIR_SEP, PLANT_CLOSE, PLANT_FIELD_SEP, PLANT_OPEN, PLANT_SEP,
};
use izl_format::{Field, IzlError, Level, Limits, Result, Scope};
use serde_json::{Map, Value};

use crate::coerce::{legacy, Coercion};
use crate::compress::inflate;

/// Decode a zlib or raw DEFLATE body.
pub(crate) fn decode_binary(bytes: &[u8], limits: &Limits) -> Result<Level> {
    let inflated = inflate(bytes, limits)?;
    let text = String::from_utf8(inflated).map_err(|_| IzlError::Utf8)?;
    parse(&text, limits)
}

/// Decode the base64 text that follows the `=` prefix.
pub(crate) fn decode_text(body: &str, limits: &Limits) -> Result<Level> {
    let bytes = STANDARD
        .decode(body.trim())
        .map_err(|e| IzlError::Base64(e.to_string()))?;
    decode_binary(&bytes, limits)
}

/// Parse inflated legacy text.
pub(crate) fn parse(text: &str, limits: &Limits) -> Result<Level> {
    let mut fields = Map::new();
    for entry in text.split(FIELD_SEP).filter(|entry| !entry.is_empty()) {
        let (name, field, raw) = split_pair(entry);
        let value = match field {
            Some(field) => coerce(Scope::Level, field, raw, limits)?,
            None => Value::String(raw.to_string()),
        };
        fields.insert(name, value);
    }
    Level::from_json_map(fields)
}

fn split_pair(entry: &str) -> (String, Option<Field>, &str) {
    let (key, raw) = entry.split_once(PAIR_SEP).unwrap_or((entry, ""));
    let field = match key.trim().parse::<u64>() {
        Ok(code) => Field::from_code(code),
        Err(_) => Field::from_name(key),
    };
    let name = field
        .map(|f| f.name().to_string())
        .unwrap_or_else(|| key.to_string());
    (name, field, raw)
}

fn coerce(scope: Scope, field: Field, raw: &str, limits: &Limits) -> Result<Value> {
    match legacy(scope, field) {
        Coercion::Integer => parse_int(field, raw).map(Value::from),
        Coercion::IntegerList => raw
            .split(LIST_SEP)
            .filter(|item| !item.trim().is_empty())
            .map(|item| parse_int(field, item).map(Value::from))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Coercion::TextList => Ok(Value::Array(
            raw.split(LIST_SEP)
                .filter(|item| !item.is_empty())
                .map(Value::from)
                .collect(),
        )),
        Coercion::Placements => parse_placements(raw, limits),
        Coercion::Text => Ok(Value::String(raw.to_string())),
    }
}

fn parse_int(field: Field, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| IzlError::invalid_field(field.name(), format!("{:?} is not an integer", raw)))
}

fn parse_placements(raw: &str, limits: &Limits) -> Result<Value> {
    let items: Vec<&str> = raw
        .split(PLANT_SEP)
        .map(|item| item.trim_matches(|c| c == PLANT_OPEN || c == PLANT_CLOSE))
        .filter(|item| !item.is_empty())
        .collect();
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
            let mut placement = Map::new();
            for pair in item.split(PLANT_FIELD_SEP).filter(|pair| !pair.is_empty()) {
                let (name, field, raw) = split_pair(pair);
                let value = match field {
                    Some(field) => coerce(Scope::Placement, field, raw, limits)?,
                    None => Value::String(raw.to_string()),
                };
                placement.insert(name, value);
            }
            Ok(Value::Object(placement))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}
