//! Parallel batch validation
//!
//! Each file is read, detected, decoded and checked on a rayon worker. Reports
//! come back in input order.

use std::fs;
use std::path::{Path, PathBuf};

use izl_codec::{decode_with_limits, detect_bytes, FormatVersion, Rules};
use izl_format::{IzlError, Limits, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use tracing::debug;

/// Batch execution options
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Decode limits applied to every file
    pub limits: Limits,
    /// Optional cap on worker threads (`None` uses the global pool)
    pub max_threads: Option<usize>,
}

/// Result for one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Verdict {
    /// Decoded and passed every rule
    Valid,
    /// Decoded but failed a rule
    Rejected(String),
    /// Could not be read or decoded
    Failed(String),
}

impl Verdict {
    /// Whether the file passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Per-file report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Input path
    pub path: PathBuf,
    /// Detected generation, when the file could be read
    pub version: Option<FormatVersion>,
    /// Outcome
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Validate files in parallel with default options.
pub fn validate_files(paths: &[PathBuf], rules: &Rules) -> Vec<FileReport> {
    check_all(paths, rules, &Limits::default(), &|_: &FileReport| {})
}

/// Validate files in parallel, calling `on_report` as each file finishes.
///
/// `on_report` runs on worker threads in completion order; the returned vector
/// is in input order.
pub fn validate_files_with<F>(
    paths: &[PathBuf],
    rules: &Rules,
    opts: &BatchOptions,
    on_report: F,
) -> Result<Vec<FileReport>>
where
    F: Fn(&FileReport) + Sync,
{
    let run = || check_all(paths, rules, &opts.limits, &on_report);

    match opts.max_threads {
        Some(threads) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build()
                .map_err(|e| IzlError::Io(std::io::Error::other(e)))?;
            Ok(pool.install(run))
        }
        None => Ok(run()),
    }
}

fn check_all<F>(paths: &[PathBuf], rules: &Rules, limits: &Limits, on_report: &F) -> Vec<FileReport>
where
    F: Fn(&FileReport) + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let report = check_file(path, rules, limits);
            on_report(&report);
            report
        })
        .collect()
}

fn check_file(path: &Path, rules: &Rules, limits: &Limits) -> FileReport {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            return FileReport {
                path: path.to_path_buf(),
                version: None,
                verdict: Verdict::Failed(IzlError::from(err).to_string()),
            }
        }
    };

    let version = detect_bytes(&bytes).version;
    let verdict = match decode_with_limits(&bytes, limits) {
        Ok(level) => match rules.check(&level) {
            Ok(()) => Verdict::Valid,
            Err(rejection) => Verdict::Rejected(rejection.to_string()),
        },
        Err(err) => Verdict::Failed(err.to_string()),
    };
    debug!(path = %path.display(), %version, ?verdict, "checked level file");

    FileReport {
        path: path.to_path_buf(),
        version: Some(version),
        verdict,
    }
}
