//! Conformance tests for the documented level scenarios and format routing

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use izl_codec::{
    decode, decode_str, detect_bytes, detect_str, encode, encode_to_string, validate, ErrorKind,
    FormatVersion, IzlError, Level, Placement, PlantRef, Rejection,
};
use izl_format::constants::{
    FIELD_SEP, LIST_SEP, PAIR_SEP, PLANT_CLOSE, PLANT_FIELD_SEP, PLANT_OPEN, PLANT_SEP,
};
use izl_format::Field;
use serde_json::json;
use smallvec::smallvec;
use std::io::Write;

fn minimal_level() -> Level {
    let value = json!({
        "name": "Test",
        "music": "Cerebrawl",
        "sun": 100,
        "stripeCol": 5,
        "lfValue": [0, 0, 0, 0, 0, 0],
        "plants": [{"plantName": "oPeashooter", "plantRow": 0, "plantCol": 0, "zIndex": 1}]
    });
    serde_json::from_value(value).expect("minimal level")
}

fn zlib(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn raw_deflate(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn legacy_text() -> String {
    let pair = |field: Field, value: &str| format!("{}{}{}", field.code(), PAIR_SEP, value);
    let plant = |name: &str, row: i64, col: i64, z: i64| {
        let pairs = [
            pair(Field::PlantName, name),
            pair(Field::PlantRow, &row.to_string()),
            pair(Field::PlantCol, &col.to_string()),
            pair(Field::ZIndex, &z.to_string()),
        ];
        format!(
            "{}{}{}",
            PLANT_OPEN,
            pairs.join(PLANT_FIELD_SEP.to_string().as_str()),
            PLANT_CLOSE
        )
    };
    let plants = [plant("oPeashooter", 0, 0, 1), plant("oSunflower", 1, 0, 2)]
        .join(PLANT_SEP.to_string().as_str());
    let flags = ["0"; 6].join(LIST_SEP.to_string().as_str());
    [
        pair(Field::Name, "Test"),
        pair(Field::Music, "Cerebrawl"),
        pair(Field::Sun, "100"),
        pair(Field::StripeCol, "5"),
        pair(Field::LfValue, &flags),
        pair(Field::Plants, &plants),
    ]
    .join(FIELD_SEP.to_string().as_str())
}

#[test]
fn minimal_level_is_valid() {
    assert_eq!(validate(&minimal_level()), Ok(()));
}

#[test]
fn duplicate_in_cell_is_rejected() {
    let mut level = minimal_level();
    level.plants = Some(vec![
        Placement::new("oPeashooter", 2, 2, 1),
        Placement::new("oPeashooter", 2, 2, 2),
    ]);
    let rejection = validate(&level).unwrap_err();
    assert_eq!(rejection, Rejection::DuplicateInTile);
    assert_eq!(rejection.to_string(), "Duplicate plant types in the same tile.");
}

#[test]
fn sun_rule_short_circuits() {
    let mut level = minimal_level();
    level.sun = Some(9991);
    // Later rules would also fail if they ran.
    level.selected_zombies = Some(vec!["oGargantuar".to_string()]);
    let message = validate(&level).unwrap_err().to_string();
    assert!(message.starts_with("Sun value exceeds 9990"), "{message}");
    assert!(!message.contains("zombie"));
}

#[test]
fn land_capacity_boundary_at_stripe_three() {
    let mut level = minimal_level();
    level.stripe_col = Some(3);
    let cells: Vec<Placement> = (0..40)
        .flat_map(|row| (0..3).map(move |col| Placement::new("oPeashooter", row, col, row * 3 + col)))
        .collect();

    level.plants = Some(cells[..100].to_vec());
    assert_eq!(validate(&level), Ok(()));

    level.plants = Some(cells[..101].to_vec());
    assert_eq!(
        validate(&level),
        Err(Rejection::TooManyPlants {
            count: 101,
            capacity: 100
        })
    );
}

#[test]
fn water_capacity_is_larger() {
    let mut level = minimal_level();
    level.stripe_col = Some(3);
    level.lf_value = Some(smallvec![0, 0, 0, 2, 0, 0]);
    let cells: Vec<Placement> = (0..45)
        .flat_map(|row| (0..3).map(move |col| Placement::new("oPeashooter", row, col, 1)))
        .collect();
    level.plants = Some(cells[..120].to_vec());
    assert_eq!(validate(&level), Ok(()));
    level.plants = Some(cells[..121].to_vec());
    assert!(matches!(validate(&level), Err(Rejection::TooManyPlants { .. })));
}

#[test]
fn stripe_bypass_scenario() {
    let mut level = minimal_level();
    level.stripe_col = Some(4);
    level.plants = Some(vec![Placement::new("oPumpkinHead", 0, 10, 1)]);
    assert_eq!(validate(&level), Ok(()));

    level.plants = Some(vec![Placement::new("oPeashooter", 0, 10, 1)]);
    assert!(matches!(validate(&level), Err(Rejection::BeyondStripe { .. })));
}

#[test]
fn unknown_text_format_is_a_format_error() {
    let err = decode_str("not-a-real-format").unwrap_err();
    assert!(matches!(err, IzlError::UnknownFormat));
    assert_eq!(err.to_string(), "Unknown level data format");
}

#[test]
fn round_trip_through_file_and_string_forms() {
    let level = minimal_level();
    assert_eq!(decode(&encode(&level).unwrap()).unwrap(), level);
    assert_eq!(decode_str(&encode_to_string(&level).unwrap()).unwrap(), level);
    // The string form is also accepted by the byte entry point.
    assert_eq!(
        decode(encode_to_string(&level).unwrap().as_bytes()).unwrap(),
        level
    );
}

#[test]
fn round_trip_keeps_optional_fields() {
    let value = json!({
        "name": "Full",
        "music": "Cerebrawl",
        "sun": 9990,
        "stripeCol": 8,
        "lfValue": [3, 2, 1, 0, 1, 2, 3, 0, 1],
        "screenshot": "data:image/png;base64,iVBORw0KGgo=",
        "selectedZombies": ["oZombie", "oImp"],
        "theme": {"sky": "night"},
        "plants": [
            {"plantName": "oLilyPad", "plantRow": 2, "plantCol": 7, "zIndex": 1,
             "eleLeft": 310, "eleTop": 212.5, "eleWidth": 80, "eleHeight": 60, "glow": true},
            {"plantName": "oHomebrew", "plantRow": 1, "plantCol": 1, "zIndex": 2}
        ]
    });
    let level: Level = serde_json::from_value(value).unwrap();
    let decoded = decode(&encode(&level).unwrap()).unwrap();
    assert_eq!(decoded, level);
    assert_eq!(
        decoded.placements()[1].plant_name,
        Some(PlantRef::from("oHomebrew"))
    );
}

#[test]
fn author_is_supplied_out_of_band() {
    let mut level = minimal_level();
    level.author = Some("zomboss".to_string());
    let decoded = decode(&encode(&level).unwrap()).unwrap();
    assert_eq!(decoded.author, None);
}

#[test]
fn magic_routes_to_current_format() {
    let mut bytes = b"IZL3".to_vec();
    bytes.extend_from_slice(b"=;|eyJ");
    assert_eq!(detect_bytes(&bytes).version, FormatVersion::V3);
    // The body is not a msgpack map, so decoding fails inside the current-format decoder.
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, IzlError::Malformed(_)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn equals_prefix_routes_to_legacy_decoder() {
    assert_eq!(detect_str("=anything;with;semicolons").unwrap(), FormatVersion::V2);

    let text = format!("={}", STANDARD.encode(zlib(legacy_text().as_bytes())));
    let level = decode_str(&text).unwrap();
    assert_eq!(level.name.as_deref(), Some("Test"));
    assert_eq!(level.sun, Some(100));
    assert_eq!(level.placements().len(), 2);
    assert_eq!(validate(&level), Ok(()));
}

#[test]
fn legacy_binary_bodies_decode() {
    let zlib_level = decode(&zlib(legacy_text().as_bytes())).unwrap();
    let raw_level = decode(&raw_deflate(legacy_text().as_bytes())).unwrap();
    assert_eq!(zlib_level, raw_level);
    assert_eq!(zlib_level.stripe_col, Some(5));
}

#[test]
fn semicolon_routes_to_original_json() {
    assert_eq!(detect_str("abc;def").unwrap(), FormatVersion::V1);

    let json = serde_json::to_string(&minimal_level()).unwrap();
    let text = format!("{};iVBORw0KGgo=", STANDARD.encode(json));
    let level = decode_str(&text).unwrap();
    assert_eq!(level.name.as_deref(), Some("Test"));
    assert_eq!(
        level.screenshot.as_deref(),
        Some("data:image/png;base64,iVBORw0KGgo=")
    );
}

#[test]
fn legacy_levels_upgrade_to_current_format() {
    let legacy = decode(&zlib(legacy_text().as_bytes())).unwrap();
    let upgraded = encode(&legacy).unwrap();
    assert_eq!(detect_bytes(&upgraded).version, FormatVersion::V3);
    assert_eq!(decode(&upgraded).unwrap(), legacy);
}

#[test]
fn corrupt_bodies_are_decode_errors() {
    let err = decode(&[0x78, 0x00, 0xFF]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let err = decode_str("|!!!").unwrap_err();
    assert!(matches!(err, IzlError::Base64(_)));
}
