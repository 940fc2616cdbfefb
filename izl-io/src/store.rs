//! Level storage collaborator
//!
//! Stores hand out raw bytes keyed by level id and generation. Decoding is the
//! pipeline's job.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use izl_codec::FormatVersion;
use izl_format::{IzlError, Result};
use tracing::debug;

const MAX_ID_LEN: usize = 64;

/// Byte-level access to stored levels.
pub trait LevelStore {
    /// Read the stored bytes of `id` in the given generation.
    fn read_level_bytes(&self, id: &str, version: FormatVersion) -> Result<Vec<u8>>;

    /// Store `bytes` as the current-generation payload of `id`.
    fn write_level_bytes(&self, id: &str, bytes: &[u8]) -> Result<()>;
}

impl<S: LevelStore + ?Sized> LevelStore for &S {
    fn read_level_bytes(&self, id: &str, version: FormatVersion) -> Result<Vec<u8>> {
        (**self).read_level_bytes(id, version)
    }

    fn write_level_bytes(&self, id: &str, bytes: &[u8]) -> Result<()> {
        (**self).write_level_bytes(id, bytes)
    }
}

/// One file per level and generation under a root directory.
#[derive(Debug, Clone)]
pub struct FsLevelStore {
    root: PathBuf,
}

impl FsLevelStore {
    /// Create a store rooted at `root`. The directory must already exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str, version: FormatVersion) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.root.join(format!("{}.{}", id, extension(version))))
    }
}

impl LevelStore for FsLevelStore {
    fn read_level_bytes(&self, id: &str, version: FormatVersion) -> Result<Vec<u8>> {
        let path = self.path_for(id, version)?;
        let bytes = fs::read(&path)?;
        debug!(id, %version, len = bytes.len(), "read level bytes");
        Ok(bytes)
    }

    fn write_level_bytes(&self, id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(id, FormatVersion::V3)?;
        let tmp = path.with_extension("izl3.tmp");

        let result = (|| -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        })();
        if let Err(err) = result {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        debug!(id, len = bytes.len(), "wrote level bytes");
        Ok(())
    }
}

/// File extension used for each generation.
pub fn extension(version: FormatVersion) -> &'static str {
    match version {
        FormatVersion::V3 => "izl3",
        FormatVersion::V2 => "izl2",
        FormatVersion::V1 => "izl",
    }
}

fn check_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(IzlError::InvalidLevelId(id.to_string()))
    }
}
