//! Conversions between msgpack values and JSON values for pass-through data

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use izl_format::Field;
use rmpv::Value as MsgValue;
use serde_json::{Map, Number, Value};

/// Text form of a map key: strings as-is, integers in decimal.
pub(crate) fn key_text(key: &MsgValue) -> Option<String> {
    match key {
        MsgValue::String(s) => Some(utf8_text(s)),
        MsgValue::Integer(i) => i
            .as_u64()
            .map(|v| v.to_string())
            .or_else(|| i.as_i64().map(|v| v.to_string())),
        _ => None,
    }
}

/// Convert a msgpack value into JSON, keeping native types.
pub(crate) fn to_json(value: MsgValue) -> Value {
    match value {
        MsgValue::Nil => Value::Null,
        MsgValue::Boolean(b) => Value::Bool(b),
        MsgValue::Integer(i) => i
            .as_i64()
            .map(Value::from)
            .or_else(|| i.as_u64().map(Value::from))
            .unwrap_or(Value::Null),
        MsgValue::F32(f) => float_to_json(f as f64),
        MsgValue::F64(f) => float_to_json(f),
        MsgValue::String(s) => Value::String(utf8_text(&s)),
        MsgValue::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
        MsgValue::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        MsgValue::Map(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                if let Some(key) = key_text(&key) {
                    map.insert(key, to_json(value));
                }
            }
            Value::Object(map)
        }
        MsgValue::Ext(_, _) => Value::Null,
    }
}

fn utf8_text(s: &rmpv::Utf8String) -> String {
    s.as_str()
        .map(str::to_string)
        .unwrap_or_else(|| String::from_utf8_lossy(s.as_bytes()).into_owned())
}

/// Integral floats become integers; non-finite values become null.
fn float_to_json(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Value::from(f as i64);
    }
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Convert a JSON value into msgpack.
pub(crate) fn from_json(value: &Value) -> MsgValue {
    match value {
        Value::Null => MsgValue::Nil,
        Value::Bool(b) => MsgValue::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                MsgValue::from(i)
            } else if let Some(u) = n.as_u64() {
                MsgValue::from(u)
            } else {
                MsgValue::F64(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => MsgValue::from(s.as_str()),
        Value::Array(items) => MsgValue::Array(items.iter().map(from_json).collect()),
        Value::Object(map) => MsgValue::Map(
            map.iter()
                .map(|(k, v)| (MsgValue::from(k.as_str()), from_json(v)))
                .collect(),
        ),
    }
}

/// Key for a pass-through entry. Decimal keys that are not table codes came from
/// integer keys and go back as integers.
pub(crate) fn passthrough_key(key: &str) -> MsgValue {
    match key.parse::<u64>() {
        Ok(code) if Field::from_code(code).is_none() => MsgValue::from(code),
        _ => MsgValue::from(key),
    }
}
