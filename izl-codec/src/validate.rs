//! Publication rules
//!
//! The validator is deliberately narrower than the decoder. Rules run in a fixed
//! order and the first failure is reported. New rules are appended, never
//! reordered.

use std::sync::OnceLock;

use ahash::{AHashMap, AHashSet};
use izl_format::catalog::{publishable_placeables, MUSIC, STRIPE_BYPASS, ZOMBIES};
use izl_format::{Level, Placement, PlantRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a level was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// A required top-level field is absent.
    #[error("Missing required field: {0}.")]
    MissingField(&'static str),
    /// A placement lacks one of its required fields.
    #[error("Plant {index} is missing required field: {field}.")]
    IncompletePlacement {
        /// Position in the placement list
        index: usize,
        /// Missing field name
        field: &'static str,
    },
    /// Too many placements share one tile.
    #[error("Too many plants in the same tile ({row}, {col}).")]
    CrowdedTile {
        /// Tile row
        row: i64,
        /// Tile column
        col: i64,
    },
    /// `lfValue` carries too many flags.
    #[error("lfValue has {len} entries, at most {max} allowed.")]
    LfValueTooLong {
        /// Actual length
        len: usize,
        /// Allowed length
        max: usize,
    },
    /// Starting sun is above the cap.
    #[error("Sun value exceeds {max} (got {sun}).")]
    SunTooHigh {
        /// Actual sun
        sun: i64,
        /// Allowed sun
        max: i64,
    },
    /// Music is not on the allow-list.
    #[error("Invalid music: {0}.")]
    InvalidMusic(String),
    /// Stripe column is out of range.
    #[error("Stripe column {col} is outside {min}-{max}.")]
    StripeOutOfRange {
        /// Actual stripe column
        col: i64,
        /// Lowest allowed
        min: i64,
        /// Highest allowed
        max: i64,
    },
    /// More placements than the board can hold.
    #[error("Too many plants: {count} exceeds the limit of {capacity}.")]
    TooManyPlants {
        /// Placement count
        count: usize,
        /// Capacity for this board
        capacity: usize,
    },
    /// A placement sits right of the stripe.
    #[error("Plant {plant} at column {col} is beyond the stripe.")]
    BeyondStripe {
        /// Placeable name
        plant: String,
        /// 0-indexed column
        col: i64,
    },
    /// The same placeable appears twice in one tile.
    #[error("Duplicate plant types in the same tile.")]
    DuplicateInTile,
    /// An enemy type is offered twice.
    #[error("Duplicate zombie type: {0}.")]
    DuplicateZombie(String),
    /// A placeable is not publishable.
    #[error("Invalid plant: {0}.")]
    InvalidPlant(String),
    /// An enemy type is not publishable.
    #[error("Invalid zombie: {0}.")]
    InvalidZombie(String),
}

/// Placement capacity by board type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capacity {
    /// Base capacity of a water board
    pub water_base: usize,
    /// Base capacity of a land board
    pub land_base: usize,
    /// Added per stripe column beyond the first on a water board
    pub water_per_column: usize,
    /// Added per stripe column beyond the first on a land board
    pub land_per_column: usize,
    /// Extra columns assumed when no stripe column is set
    pub default_extra_columns: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            water_base: 108,
            land_base: 90,
            water_per_column: 6,
            land_per_column: 5,
            default_extra_columns: 2,
        }
    }
}

impl Capacity {
    /// Maximum placement count for a board
    pub fn for_board(&self, water: bool, stripe_col: Option<i64>) -> usize {
        let extra = stripe_col
            .map(|col| usize::try_from(col.saturating_sub(1)).unwrap_or(0))
            .unwrap_or(self.default_extra_columns);
        let (base, per_column) = if water {
            (self.water_base, self.water_per_column)
        } else {
            (self.land_base, self.land_per_column)
        };
        base.saturating_add(per_column.saturating_mul(extra))
    }
}

/// Validator thresholds and allow-lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Highest starting sun
    pub max_sun: i64,
    /// Most placements per tile
    pub max_plants_per_tile: usize,
    /// Longest accepted `lfValue`
    pub max_lf_len: usize,
    /// Lowest stripe column
    pub min_stripe_col: i64,
    /// Highest stripe column
    pub max_stripe_col: i64,
    /// Placement capacity formula
    pub capacity: Capacity,
    /// Accepted music tracks
    pub music: Vec<String>,
    /// Placeables allowed past the stripe
    pub stripe_bypass: Vec<String>,
    /// Publishable placeables
    pub placeables: Vec<String>,
    /// Publishable enemy types
    pub zombies: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_sun: 9990,
            max_plants_per_tile: 3,
            max_lf_len: 7,
            min_stripe_col: 3,
            max_stripe_col: 8,
            capacity: Capacity::default(),
            music: MUSIC.iter().map(|s| s.to_string()).collect(),
            stripe_bypass: STRIPE_BYPASS.iter().map(|s| s.to_string()).collect(),
            placeables: publishable_placeables().map(str::to_string).collect(),
            zombies: ZOMBIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn listed(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry == name)
}

impl Rules {
    /// Check a level, reporting the first failing rule.
    pub fn check(&self, level: &Level) -> Result<(), Rejection> {
        let (plants, music, sun, flags, stripe_col) = require_fields(level)?;

        for (index, placement) in plants.iter().enumerate() {
            require_placement(index, placement)?;
        }

        let mut per_tile: AHashMap<(i64, i64), usize> = AHashMap::new();
        for placement in plants {
            if let Some((row, col)) = placement.cell() {
                let count = per_tile.entry((row, col)).or_default();
                *count += 1;
                if *count > self.max_plants_per_tile {
                    return Err(Rejection::CrowdedTile { row, col });
                }
            }
        }

        if flags.len() > self.max_lf_len {
            return Err(Rejection::LfValueTooLong {
                len: flags.len(),
                max: self.max_lf_len,
            });
        }

        if sun > self.max_sun {
            return Err(Rejection::SunTooHigh {
                sun,
                max: self.max_sun,
            });
        }

        if !listed(&self.music, music) {
            return Err(Rejection::InvalidMusic(music.to_string()));
        }

        if !(self.min_stripe_col..=self.max_stripe_col).contains(&stripe_col) {
            return Err(Rejection::StripeOutOfRange {
                col: stripe_col,
                min: self.min_stripe_col,
                max: self.max_stripe_col,
            });
        }

        let capacity = self
            .capacity
            .for_board(level.is_water(), level.stripe_col);
        if plants.len() > capacity {
            return Err(Rejection::TooManyPlants {
                count: plants.len(),
                capacity,
            });
        }

        for placement in plants {
            let (Some(plant), Some(col)) = (&placement.plant_name, placement.plant_col) else {
                continue;
            };
            let bypass = plant
                .as_name()
                .is_some_and(|name| listed(&self.stripe_bypass, name));
            if col >= stripe_col && !bypass {
                return Err(Rejection::BeyondStripe {
                    plant: plant.to_string(),
                    col,
                });
            }
        }

        let mut seen: AHashSet<(i64, i64, &PlantRef)> = AHashSet::new();
        for placement in plants {
            if let (Some((row, col)), Some(plant)) = (placement.cell(), &placement.plant_name) {
                if !seen.insert((row, col, plant)) {
                    return Err(Rejection::DuplicateInTile);
                }
            }
        }

        let zombies = level.selected_zombies.as_deref().unwrap_or(&[]);
        let mut offered: AHashSet<&str> = AHashSet::new();
        for zombie in zombies {
            if !offered.insert(zombie.as_str()) {
                return Err(Rejection::DuplicateZombie(zombie.clone()));
            }
        }

        for plant in plants.iter().filter_map(|p| p.plant_name.as_ref()) {
            let allowed = plant
                .as_name()
                .is_some_and(|name| listed(&self.placeables, name));
            if !allowed {
                return Err(Rejection::InvalidPlant(plant.to_string()));
            }
        }

        for zombie in zombies {
            if !listed(&self.zombies, zombie) {
                return Err(Rejection::InvalidZombie(zombie.clone()));
            }
        }

        Ok(())
    }
}

type Required<'a> = (&'a [Placement], &'a str, i64, &'a [u8], i64);

fn require_fields(level: &Level) -> Result<Required<'_>, Rejection> {
    let plants = level
        .plants
        .as_deref()
        .ok_or(Rejection::MissingField("plants"))?;
    let music = level
        .music
        .as_deref()
        .ok_or(Rejection::MissingField("music"))?;
    let sun = level.sun.ok_or(Rejection::MissingField("sun"))?;
    if level.name.is_none() {
        return Err(Rejection::MissingField("name"));
    }
    let flags = level
        .lf_value
        .as_deref()
        .ok_or(Rejection::MissingField("lfValue"))?;
    let stripe_col = level
        .stripe_col
        .ok_or(Rejection::MissingField("stripeCol"))?;
    Ok((plants, music, sun, flags, stripe_col))
}

fn require_placement(index: usize, placement: &Placement) -> Result<(), Rejection> {
    let missing = if placement.z_index.is_none() {
        Some("zIndex")
    } else if placement.plant_row.is_none() {
        Some("plantRow")
    } else if placement.plant_col.is_none() {
        Some("plantCol")
    } else if placement.plant_name.is_none() {
        Some("plantName")
    } else {
        None
    };
    match missing {
        Some(field) => Err(Rejection::IncompletePlacement { index, field }),
        None => Ok(()),
    }
}

fn default_rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(Rules::default)
}

/// Check a level against the default rules.
pub fn validate(level: &Level) -> Result<(), Rejection> {
    default_rules().check(level)
}
