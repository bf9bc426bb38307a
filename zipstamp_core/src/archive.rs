//! Zip archival of files and directory trees.

use crate::error::{Error, Result};
use crate::walk::tree_walker;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Counters for a finished archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveStats {
    /// Number of file entries written.
    pub entries: usize,
    /// Number of entries that were skipped (symlinks, special or unreadable files).
    pub skipped: usize,
    /// Total uncompressed bytes written.
    pub bytes: u64,
}

/// Archive every regular file under `input_dir_path` into a zip file.
///
/// Entries are named by their path relative to `input_dir_path`, joined with
/// `/`. Symlinks, special files and files that cannot be opened are skipped
/// and logged. The archive is staged in a temporary file next to
/// `output_file_path` and only moved into place once complete.
pub fn zip_dir(
    input_dir_path: impl AsRef<Path>,
    output_file_path: impl AsRef<Path>,
) -> Result<ArchiveStats> {
    let input_dir = input_dir_path.as_ref();
    let output_file = output_file_path.as_ref();

    if !input_dir.is_dir() {
        return Err(Error::not_a_directory(input_dir));
    }

    let output_abs = std::path::absolute(output_file)?;
    let mut skipped = 0;
    let mut files = Vec::new();

    for entry in tree_walker(input_dir).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                skipped += 1;
                continue;
            }
        };

        let path = entry.path();
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            tracing::warn!(path = %path.display(), "skipping symlink or special file");
            skipped += 1;
            continue;
        }
        if std::path::absolute(path)? == output_abs {
            continue;
        }

        let Some(name) = path.strip_prefix(input_dir).ok().and_then(entry_name) else {
            tracing::warn!(path = %path.display(), "skipping entry with non UTF-8 name");
            skipped += 1;
            continue;
        };
        files.push((path.to_path_buf(), name));
    }

    // The staging file is created after the walk so it never shows up in it.
    let mut writer = ArchiveWriter::create(output_file)?;
    writer.stats.skipped = skipped;
    for (path, name) in &files {
        writer.add_file(path, name)?;
    }

    let stats = writer.finish()?;
    tracing::debug!(
        output = %output_file.display(),
        entries = stats.entries,
        skipped = stats.skipped,
        "wrote directory archive"
    );
    Ok(stats)
}

/// Archive a single file as one entry named `entry_name`.
pub fn zip_file(
    input_file_path: impl AsRef<Path>,
    entry_name: &str,
    output_file_path: impl AsRef<Path>,
) -> Result<ArchiveStats> {
    let mut writer = ArchiveWriter::create(output_file_path.as_ref())?;
    writer.add_file(input_file_path.as_ref(), entry_name)?;
    writer.finish()
}

/// Join the normal components of a relative path with `/`.
fn entry_name(rel: &Path) -> Option<String> {
    let parts = rel
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Zip writer staged in a temporary file beside its destination.
struct ArchiveWriter {
    zip: ZipWriter<NamedTempFile>,
    dest: PathBuf,
    stats: ArchiveStats,
}

impl ArchiveWriter {
    fn create(dest: &Path) -> Result<Self> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp_file = NamedTempFile::new_in(dir)?;

        Ok(Self {
            zip: ZipWriter::new(temp_file),
            dest: dest.to_path_buf(),
            stats: ArchiveStats::default(),
        })
    }

    /// Deflate `path` into the archive as `name`.
    ///
    /// A file that can no longer be opened is counted as skipped.
    fn add_file(&mut self, path: &Path, name: &str) -> Result<()> {
        let mut file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                self.stats.skipped += 1;
                return Ok(());
            }
        };
        let metadata = file.metadata()?;

        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(file_mode(&metadata))
            .large_file(metadata.len() >= u64::from(u32::MAX));
        if let Some(mtime) = modified_time(&metadata) {
            options = options.last_modified_time(mtime);
        }

        self.zip.start_file(name, options)?;
        let written = io::copy(&mut file, &mut self.zip)?;

        tracing::debug!(entry = name, bytes = written, "archived file");
        self.stats.entries += 1;
        self.stats.bytes += written;
        Ok(())
    }

    /// Write the central directory and move the archive into place.
    fn finish(self) -> Result<ArchiveStats> {
        let temp_file = self.zip.finish()?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.dest)?;
        Ok(self.stats)
    }
}

/// Convert the file mtime to a zip timestamp, if it fits the DOS range.
fn modified_time(metadata: &fs::Metadata) -> Option<zip::DateTime> {
    use chrono::{Datelike, Timelike};

    let modified: chrono::DateTime<chrono::Local> = metadata.modified().ok()?.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(modified.year()).ok()?,
        modified.month() as u8,
        modified.day() as u8,
        modified.hour() as u8,
        modified.minute() as u8,
        modified.second() as u8,
    )
    .ok()
}

/// Permission bits stored with each entry.
#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

/// Permission bits stored with each entry (Windows fallback).
#[cfg(not(unix))]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
