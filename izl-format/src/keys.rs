//! Key-mapping table and placeable-name list
//!
//! Both tables are shared with the browser encoder. Codes and positions are part
//! of the wire format: append only, never reorder.

use std::sync::OnceLock;

use ahash::AHashMap;

/// Where a field lives in the level structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Top-level level field
    Level,
    /// Field of one placement
    Placement,
}

/// Field names known to the key-mapping table; the discriminant is the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    /// Placement list
    Plants = 0,
    /// Background music
    Music = 1,
    /// Starting sun
    Sun = 2,
    /// Level title
    Name = 3,
    /// Packed miscellaneous flags
    LfValue = 4,
    /// Stripe column
    StripeCol = 5,
    /// Placeable object name
    PlantName = 6,
    /// Grid row
    PlantRow = 7,
    /// Grid column
    PlantCol = 8,
    /// Stacking order
    ZIndex = 9,
    /// Layout hint: left offset
    EleLeft = 10,
    /// Layout hint: top offset
    EleTop = 11,
    /// Layout hint: width
    EleWidth = 12,
    /// Layout hint: height
    EleHeight = 13,
    /// Embedded thumbnail
    Screenshot = 14,
    /// Enemy types offered to the player
    SelectedZombies = 15,
}

/// The single source list both lookup directions are derived from.
pub const FIELDS: [(Field, &str); 16] = [
    (Field::Plants, "plants"),
    (Field::Music, "music"),
    (Field::Sun, "sun"),
    (Field::Name, "name"),
    (Field::LfValue, "lfValue"),
    (Field::StripeCol, "stripeCol"),
    (Field::PlantName, "plantName"),
    (Field::PlantRow, "plantRow"),
    (Field::PlantCol, "plantCol"),
    (Field::ZIndex, "zIndex"),
    (Field::EleLeft, "eleLeft"),
    (Field::EleTop, "eleTop"),
    (Field::EleWidth, "eleWidth"),
    (Field::EleHeight, "eleHeight"),
    (Field::Screenshot, "screenshot"),
    (Field::SelectedZombies, "selectedZombies"),
];

impl Field {
    /// Wire code of this field
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Field name used in the canonical structure
    pub fn name(self) -> &'static str {
        FIELDS[self as usize].1
    }

    /// Look a field up by wire code
    pub fn from_code(code: u64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| FIELDS.get(idx))
            .map(|(field, _)| *field)
    }

    /// Look a field up by name
    pub fn from_name(name: &str) -> Option<Self> {
        FIELDS
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map(|(field, _)| *field)
    }

    /// Structure level this field belongs to
    pub fn scope(self) -> Scope {
        match self {
            Field::PlantName
            | Field::PlantRow
            | Field::PlantCol
            | Field::ZIndex
            | Field::EleLeft
            | Field::EleTop
            | Field::EleWidth
            | Field::EleHeight => Scope::Placement,
            _ => Scope::Level,
        }
    }
}

/// Every placeable name the decoder understands, in wire-index order.
///
/// Includes experimental entries that are not publishable; see
/// [`crate::catalog::EXPERIMENTAL_PLACEABLES`].
pub const PLACEABLES: [&str; 53] = [
    "oPeashooter",
    "oSunflower",
    "oCherryBomb",
    "oWallNut",
    "oPotatoMine",
    "oSnowPea",
    "oChomper",
    "oRepeater",
    "oPuffShroom",
    "oSunShroom",
    "oFumeShroom",
    "oGraveBuster",
    "oHypnoShroom",
    "oScaredyShroom",
    "oIceShroom",
    "oDoomShroom",
    "oLilyPad",
    "oSquash",
    "oThreepeater",
    "oTangleKelp",
    "oJalapeno",
    "oSpikeweed",
    "oTorchwood",
    "oTallNut",
    "oSeaShroom",
    "oPlantern",
    "oCactus",
    "oBlover",
    "oSplitPea",
    "oStarfruit",
    "oPumpkinHead",
    "oMagnetShroom",
    "oCabbagePult",
    "oFlowerPot",
    "oKernelPult",
    "oCoffeeBean",
    "oGarlic",
    "oUmbrellaLeaf",
    "oMarigold",
    "oMelonPult",
    "oGatlingPea",
    "oTwinSunflower",
    "oGloomShroom",
    "oCattail",
    "oWinterMelon",
    "oGoldMagnet",
    "oSpikerock",
    "oCobCannon",
    "oImitater",
    "oLeftPea",
    "oIceBergLettuce",
    "oBonkChoy",
    "oSnapDragon",
];

fn placeable_lookup() -> &'static AHashMap<&'static str, u64> {
    static LOOKUP: OnceLock<AHashMap<&'static str, u64>> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        PLACEABLES
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx as u64))
            .collect()
    })
}

/// Resolve a wire index to its placeable name
pub fn placeable_name(index: u64) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|idx| PLACEABLES.get(idx))
        .copied()
}

/// Wire index of a placeable name
pub fn placeable_index(name: &str) -> Option<u64> {
    placeable_lookup().get(name).copied()
}
