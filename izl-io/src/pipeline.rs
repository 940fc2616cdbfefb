//! Ingest, load and re-encode pipelines
//!
//! Decode errors are hard failures everywhere except [`load_for_thumbnail`],
//! which degrades to `None` so a preview never breaks a listing.

use izl_codec::{decode, encode, FormatVersion, Rejection, Rules};
use izl_format::{Level, Result};
use tracing::{info, warn};

use crate::store::LevelStore;

/// Outcome of [`ingest`]
#[derive(Debug, Clone, PartialEq)]
pub enum Ingest {
    /// Level passed the rules and was stored in the current format.
    Accepted {
        /// Bytes written to the store
        bytes: Vec<u8>,
    },
    /// Level decoded but failed a publication rule. Nothing was written.
    Rejected(Rejection),
}

/// Decode an uploaded payload, attach its author, validate and store it.
pub fn ingest<S: LevelStore + ?Sized>(
    store: &S,
    id: &str,
    payload: &[u8],
    author: Option<&str>,
    rules: &Rules,
) -> Result<Ingest> {
    let mut level = decode(payload)?;
    if let Some(author) = author {
        level.author = Some(author.to_string());
    }

    if let Err(rejection) = rules.check(&level) {
        info!(id, %rejection, "level rejected");
        return Ok(Ingest::Rejected(rejection));
    }

    let bytes = encode(&level)?;
    store.write_level_bytes(id, &bytes)?;
    info!(
        id,
        plants = level.placements().len(),
        len = bytes.len(),
        "level accepted"
    );
    Ok(Ingest::Accepted { bytes })
}

/// Read and decode a stored level. Every failure propagates.
pub fn load<S: LevelStore + ?Sized>(store: &S, id: &str, version: FormatVersion) -> Result<Level> {
    let bytes = store.read_level_bytes(id, version)?;
    decode(&bytes)
}

/// Best-effort variant of [`load`] for previews.
pub fn load_for_thumbnail<S: LevelStore + ?Sized>(
    store: &S,
    id: &str,
    version: FormatVersion,
) -> Option<Level> {
    match load(store, id, version) {
        Ok(level) => Some(level),
        Err(err) => {
            warn!(id, %version, error = %err, "level unavailable for thumbnail");
            None
        }
    }
}

/// Apply an edit to a stored level and write it back in the current format.
///
/// No rules are checked; this is the moderation path.
pub fn reencode<S, F>(store: &S, id: &str, version: FormatVersion, edit: F) -> Result<Vec<u8>>
where
    S: LevelStore + ?Sized,
    F: FnOnce(&mut Level),
{
    let mut level = load(store, id, version)?;
    edit(&mut level);
    let bytes = encode(&level)?;
    store.write_level_bytes(id, &bytes)?;
    info!(id, from = %version, len = bytes.len(), "level re-encoded");
    Ok(bytes)
}
