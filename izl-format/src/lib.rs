//! IZL Format - Core primitives for "I, Zombie" level payloads
//!
//! This crate provides the building blocks shared by every codec generation,
//! with no I/O dependencies. It includes:
//!
//! - Magic numbers, text prefixes and legacy separators
//! - The key-mapping table and placeable-name list
//! - Publication allow-lists
//! - `lfValue` bit packing
//! - The canonical `Level` / `Placement` model
//! - Error types and decode limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod constants;
pub mod error;
pub mod keys;
pub mod level;
pub mod lfpack;
pub mod limits;

// Re-export commonly used types
pub use error::{ErrorKind, IzlError, Result};
pub use keys::{Field, Scope};
pub use level::{Dimension, Level, Placement, PlantRef};
pub use lfpack::LfValue;
pub use limits::Limits;
