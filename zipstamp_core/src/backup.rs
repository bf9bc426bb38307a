//! Timestamped zip backups of a file or directory.

use crate::archive::{zip_dir, zip_file};
use crate::error::{Error, Result};
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a successful backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupArtifact {
    /// Path that was backed up.
    pub input: PathBuf,
    /// The written zip archive.
    pub archive: PathBuf,
    /// Timestamp embedded in the archive name.
    pub timestamp: String,
    /// Number of files in the archive.
    pub entries: usize,
}

/// Back up `input_path` into `<name>_<timestamp>.zip` using the local clock.
///
/// See [`backup_at`].
pub fn backup(
    input_path: impl AsRef<Path>,
    output_dir_path: Option<&Path>,
) -> Result<BackupArtifact> {
    backup_at(input_path, output_dir_path, Local::now().naive_local())
}

/// Back up `input_path` using `now` for the archive timestamp.
///
/// The archive goes into `output_dir_path`, or next to the input when `None`.
/// Directories are archived recursively; a regular file becomes a single entry
/// named after it. Anything else that exists (FIFOs, devices, ...) is rejected
/// with [`Error::UnsupportedInput`].
pub fn backup_at(
    input_path: impl AsRef<Path>,
    output_dir_path: Option<&Path>,
    now: NaiveDateTime,
) -> Result<BackupArtifact> {
    let input = input_path.as_ref();
    if !input.try_exists()? {
        return Err(Error::not_found(input));
    }

    let output_dir = match output_dir_path {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(input),
    };

    let name = base_name(input)?;
    let timestamp = format_timestamp(&now);
    let archive = output_dir.join(format!("{name}_{timestamp}.zip"));

    let metadata = fs::metadata(input)?;
    let stats = if metadata.is_dir() {
        zip_dir(input, &archive)?
    } else if metadata.is_file() {
        zip_file(input, &name, &archive)?
    } else {
        return Err(Error::unsupported_input(input, "not a regular file or directory"));
    };

    tracing::info!(
        input = %input.display(),
        archive = %archive.display(),
        entries = stats.entries,
        "backup complete"
    );

    Ok(BackupArtifact {
        input: input.to_path_buf(),
        archive,
        timestamp,
        entries: stats.entries,
    })
}

/// Format `year_month_day_hour_minute_second` without zero padding.
pub fn format_timestamp<T: Datelike + Timelike>(now: &T) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Parent directory of `input`, or `.` for a bare name.
fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Final path component of `input`, resolving `.` and `..` when needed.
fn base_name(input: &Path) -> Result<String> {
    let name = match input.file_name() {
        Some(name) => name.to_os_string(),
        None => fs::canonicalize(input)?
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| Error::unsupported_input(input, "path has no file name"))?,
    };

    name.into_string()
        .map_err(|_| Error::unsupported_input(input, "file name is not valid UTF-8"))
}
