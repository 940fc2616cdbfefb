//! IZL I/O - Level storage and high-level pipelines
//!
//! This crate connects the pure codec to the outside world:
//!
//! - The [`LevelStore`] collaborator and a filesystem implementation
//! - Ingest, load and re-encode pipelines with soft and hard failure modes
//! - Parallel batch validation of level files

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod pipeline;
pub mod store;

// Re-export commonly used types
pub use izl_codec::{FormatVersion, Rejection, Rules};
pub use izl_format::{IzlError, Level, Limits, Result};

pub use batch::{validate_files, validate_files_with, BatchOptions, FileReport, Verdict};
pub use pipeline::{ingest, load, load_for_thumbnail, reencode, Ingest};
pub use store::{FsLevelStore, LevelStore};
