//! Canonical in-memory level ("clone") and placement structures

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::constants::{WATER_FLAG_INDEX, WATER_FLAG_VALUE};
use crate::error::Result;
use crate::keys::placeable_name;
use crate::lfpack::LfValue;

/// Identity of a placed object: a name, or a wire index the decoder could not resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlantRef {
    /// Index outside the placeable list, kept verbatim
    Index(u64),
    /// Placeable name
    Named(String),
    /// Any other numeric value (negative or fractional), kept verbatim
    Raw(Number),
}

impl PlantRef {
    /// Resolve an index through the placeable list, leaving unknown indices untouched.
    pub fn resolve(self) -> Self {
        match self {
            PlantRef::Index(idx) => match placeable_name(idx) {
                Some(name) => PlantRef::Named(name.to_string()),
                None => PlantRef::Index(idx),
            },
            named => named,
        }
    }

    /// Name, if this reference is resolved
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PlantRef::Named(name) => Some(name),
            PlantRef::Index(_) | PlantRef::Raw(_) => None,
        }
    }
}

impl fmt::Display for PlantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlantRef::Index(idx) => write!(f, "{}", idx),
            PlantRef::Named(name) => f.write_str(name),
            PlantRef::Raw(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for PlantRef {
    fn from(name: &str) -> Self {
        PlantRef::Named(name.to_string())
    }
}

/// Pixel-space layout hint. Legacy payloads keep these as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    /// Native number
    Number(f64),
    /// Uncoerced legacy text
    Text(String),
}

impl Dimension {
    /// Numeric value, parsing legacy text when possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Dimension::Number(value) => Some(*value),
            Dimension::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// One placed object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Placeable identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<PlantRef>,
    /// Grid row (0-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_row: Option<i64>,
    /// Grid column (0-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_col: Option<i64>,
    /// Stacking order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Thumbnail layout hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_left: Option<Dimension>,
    /// Thumbnail layout hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_top: Option<Dimension>,
    /// Thumbnail layout hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_width: Option<Dimension>,
    /// Thumbnail layout hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_height: Option<Dimension>,
    /// Keys outside the key-mapping table
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Placement {
    /// Placement with the four required fields set
    pub fn new(plant_name: &str, plant_row: i64, plant_col: i64, z_index: i64) -> Self {
        Self {
            plant_name: Some(PlantRef::from(plant_name)),
            plant_row: Some(plant_row),
            plant_col: Some(plant_col),
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    /// `(row, col)` when both coordinates are present
    pub fn cell(&self) -> Option<(i64, i64)> {
        Some((self.plant_row?, self.plant_col?))
    }
}

/// A decoded level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Player-chosen title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Uploader, attached out-of-band; never part of the wire payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Starting sun
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sun: Option<i64>,
    /// Background music
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
    /// Rightmost placeable column for most objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_col: Option<i64>,
    /// Miscellaneous flags; index 3 marks water levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lf_value: Option<LfValue>,
    /// Placed objects in authoring order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plants: Option<Vec<Placement>>,
    /// Embedded thumbnail data-URL (legacy payloads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Enemy types offered to the player
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_zombies: Option<Vec<String>>,
    /// Keys outside the key-mapping table
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Level {
    /// Build a level from a name-keyed JSON object and resolve numeric plant names.
    pub fn from_json_map(map: Map<String, Value>) -> Result<Self> {
        let mut level: Level = serde_json::from_value(Value::Object(map))?;
        level.resolve_plant_refs();
        Ok(level)
    }

    /// Replace resolvable numeric plant names with their placeable names.
    pub fn resolve_plant_refs(&mut self) {
        for placement in self.plants.iter_mut().flatten() {
            placement.plant_name = placement.plant_name.take().map(PlantRef::resolve);
        }
    }

    /// Placements, empty when the field is absent
    pub fn placements(&self) -> &[Placement] {
        self.plants.as_deref().unwrap_or(&[])
    }

    /// Whether the flag array marks this as a water level
    pub fn is_water(&self) -> bool {
        self.lf_value
            .as_ref()
            .and_then(|flags| flags.get(WATER_FLAG_INDEX))
            .is_some_and(|flag| *flag == WATER_FLAG_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smallvec::smallvec;

    #[test]
    fn test_from_json_map_resolves_indices() {
        let value = json!({
            "name": "Test",
            "plants": [
                {"plantName": 0, "plantRow": 1, "plantCol": 2, "zIndex": 3},
                {"plantName": 9999, "plantRow": 1, "plantCol": 3, "zIndex": 4},
                {"plantName": "oSnowPea", "plantRow": 2, "plantCol": 2, "zIndex": 5}
            ]
        });
        let level = Level::from_json_map(value.as_object().unwrap().clone()).unwrap();
        let names: Vec<_> = level
            .placements()
            .iter()
            .map(|p| p.plant_name.clone().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                PlantRef::from("oPeashooter"),
                PlantRef::Index(9999),
                PlantRef::from("oSnowPea"),
            ]
        );
    }

    #[test]
    fn test_out_of_range_numbers_are_kept_raw() {
        let value = json!({
            "plants": [
                {"plantName": -1, "plantRow": 0, "plantCol": 0, "zIndex": 1},
                {"plantName": 1.5, "plantRow": 0, "plantCol": 1, "zIndex": 2}
            ]
        });
        let level = Level::from_json_map(value.as_object().unwrap().clone()).unwrap();
        let names: Vec<_> = level
            .placements()
            .iter()
            .map(|p| p.plant_name.clone().unwrap())
            .collect();
        assert_eq!(names[0], PlantRef::Raw((-1i64).into()));
        assert_eq!(names[1].to_string(), "1.5");
        assert_eq!(serde_json::to_value(&level).unwrap(), value);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let value = json!({"name": "x", "theme": "night", "plants": [{"plantName": "oSunflower", "glow": true}]});
        let level = Level::from_json_map(value.as_object().unwrap().clone()).unwrap();
        assert_eq!(level.extra.get("theme"), Some(&json!("night")));
        assert_eq!(level.placements()[0].extra.get("glow"), Some(&json!(true)));

        let back = serde_json::to_value(&level).unwrap();
        assert_eq!(back["theme"], json!("night"));
        assert_eq!(back["plants"][0]["glow"], json!(true));
    }

    #[test]
    fn test_water_flag() {
        let mut level = Level {
            lf_value: Some(smallvec![0, 0, 0, 2, 0, 0]),
            ..Level::default()
        };
        assert!(level.is_water());
        level.lf_value = Some(smallvec![0, 0, 0, 1, 0, 0]);
        assert!(!level.is_water());
        level.lf_value = None;
        assert!(!level.is_water());
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(Dimension::Number(12.5).as_f64(), Some(12.5));
        assert_eq!(Dimension::Text(" 40 ".into()).as_f64(), Some(40.0));
        assert_eq!(Dimension::Text("wide".into()).as_f64(), None);
    }

    #[test]
    fn test_absent_layout_hints_decode() {
        let value = json!({"plants": [{"plantName": "oWallNut", "plantRow": 0, "plantCol": 0, "zIndex": 1}]});
        let level = Level::from_json_map(value.as_object().unwrap().clone()).unwrap();
        let placement = &level.placements()[0];
        assert!(placement.ele_left.is_none());
        assert_eq!(placement.cell(), Some((0, 0)));
    }
}
