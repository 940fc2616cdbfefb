//! Canonical encoder: always writes the current ("IZL3") generation

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use izl_format::constants::{FILE_MAGIC, TEXT_PREFIX_V3};
use izl_format::keys::placeable_index;
use izl_format::lfpack::pack;
use izl_format::{Dimension, Field, IzlError, Level, Placement, PlantRef, Result};
use rmpv::Value as MsgValue;
use serde_json::Value;
use tracing::debug;

use crate::compress::deflate_best;
use crate::msgpack::{from_json, passthrough_key};

/// Encode to the file form: `IZL3` magic followed by the compressed body.
pub fn encode(level: &Level) -> Result<Vec<u8>> {
    let body = encode_body(level)?;
    let mut out = Vec::with_capacity(FILE_MAGIC.len() + body.len());
    out.extend_from_slice(&FILE_MAGIC);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Encode to the string form: `|` followed by the base64 body.
pub fn encode_to_string(level: &Level) -> Result<String> {
    let body = encode_body(level)?;
    Ok(format!("{}{}", TEXT_PREFIX_V3, STANDARD.encode(body)))
}

/// Compressed msgpack body without magic or prefix.
pub fn encode_body(level: &Level) -> Result<Vec<u8>> {
    let value = level_to_msgpack(level)?;
    let mut packed = Vec::new();
    rmpv::encode::write_value(&mut packed, &value)
        .map_err(|e| IzlError::MessagePack(e.to_string()))?;
    let body = deflate_best(&packed)?;
    debug!(
        msgpack_len = packed.len(),
        body_len = body.len(),
        "encoded level body"
    );
    Ok(body)
}

fn entry(field: Field, value: MsgValue) -> (MsgValue, MsgValue) {
    (MsgValue::from(field.code()), value)
}

fn level_to_msgpack(level: &Level) -> Result<MsgValue> {
    let mut entries = Vec::new();

    if let Some(plants) = &level.plants {
        let items = plants.iter().map(placement_to_msgpack).collect();
        entries.push(entry(Field::Plants, MsgValue::Array(items)));
    }
    if let Some(music) = &level.music {
        entries.push(entry(Field::Music, MsgValue::from(music.as_str())));
    }
    if let Some(sun) = level.sun {
        entries.push(entry(Field::Sun, MsgValue::from(sun)));
    }
    if let Some(name) = &level.name {
        entries.push(entry(Field::Name, MsgValue::from(name.as_str())));
    }
    if let Some(flags) = &level.lf_value {
        entries.push(entry(Field::LfValue, MsgValue::from(pack(flags)?)));
    }
    if let Some(stripe_col) = level.stripe_col {
        entries.push(entry(Field::StripeCol, MsgValue::from(stripe_col)));
    }
    if let Some(screenshot) = &level.screenshot {
        entries.push(entry(Field::Screenshot, MsgValue::from(screenshot.as_str())));
    }
    if let Some(zombies) = &level.selected_zombies {
        let items = zombies.iter().map(|z| MsgValue::from(z.as_str())).collect();
        entries.push(entry(Field::SelectedZombies, MsgValue::Array(items)));
    }
    push_extra(&mut entries, &level.extra);

    Ok(MsgValue::Map(entries))
}

fn placement_to_msgpack(placement: &Placement) -> MsgValue {
    let mut entries = Vec::new();

    if let Some(plant) = &placement.plant_name {
        entries.push(entry(Field::PlantName, plant_to_msgpack(plant)));
    }
    let coordinates = [
        (Field::PlantRow, placement.plant_row),
        (Field::PlantCol, placement.plant_col),
        (Field::ZIndex, placement.z_index),
    ];
    for (field, value) in coordinates {
        if let Some(value) = value {
            entries.push(entry(field, MsgValue::from(value)));
        }
    }
    let hints = [
        (Field::EleLeft, &placement.ele_left),
        (Field::EleTop, &placement.ele_top),
        (Field::EleWidth, &placement.ele_width),
        (Field::EleHeight, &placement.ele_height),
    ];
    for (field, value) in hints {
        if let Some(value) = value {
            entries.push(entry(field, dimension_to_msgpack(value)));
        }
    }
    push_extra(&mut entries, &placement.extra);

    MsgValue::Map(entries)
}

fn plant_to_msgpack(plant: &PlantRef) -> MsgValue {
    match plant {
        PlantRef::Named(name) => match placeable_index(name) {
            Some(idx) => MsgValue::from(idx),
            None => MsgValue::from(name.as_str()),
        },
        PlantRef::Index(idx) => MsgValue::from(*idx),
        PlantRef::Raw(number) => from_json(&Value::Number(number.clone())),
    }
}

fn dimension_to_msgpack(value: &Dimension) -> MsgValue {
    match value {
        Dimension::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            MsgValue::from(*n as i64)
        }
        Dimension::Number(n) => MsgValue::F64(*n),
        Dimension::Text(text) => MsgValue::from(text.as_str()),
    }
}

fn push_extra(entries: &mut Vec<(MsgValue, MsgValue)>, extra: &BTreeMap<String, Value>) {
    entries.extend(
        extra
            .iter()
            .map(|(key, value)| (passthrough_key(key), from_json(value))),
    );
}
