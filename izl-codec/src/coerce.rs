//! Per-generation value coercion
//!
//! V1 (JSON) and V3 (msgpack) keep the native types of their containers. The
//! legacy delimiter format carries everything as text and only coerces the
//! fields listed in [`legacy`]; every other field stays a string.

use izl_format::{Field, Scope};

/// How a legacy text value becomes a structured value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Parse as a signed integer
    Integer,
    /// Split on the list separator and parse each item as an integer
    IntegerList,
    /// Split on the list separator, items stay strings
    TextList,
    /// Split into placement strings
    Placements,
    /// Keep as a string
    Text,
}

/// Coercion applied to a legacy field in the given scope
pub fn legacy(scope: Scope, field: Field) -> Coercion {
    match (scope, field) {
        (Scope::Level, Field::Sun | Field::StripeCol) => Coercion::Integer,
        (Scope::Level, Field::LfValue) => Coercion::IntegerList,
        (Scope::Level, Field::SelectedZombies) => Coercion::TextList,
        (Scope::Level, Field::Plants) => Coercion::Placements,
        (Scope::Placement, Field::ZIndex | Field::PlantRow | Field::PlantCol) => {
            Coercion::Integer
        }
        _ => Coercion::Text,
    }
}
