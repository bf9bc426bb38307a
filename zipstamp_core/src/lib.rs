//! # Zipstamp Core
//!
//! Filesystem helpers for timestamped zip backups.
//!
//! This library allocates collision-free paths, creates files that are removed
//! again when their owner goes out of scope, and archives whole directory
//! trees into a single zip file.
//!
//! ## Features
//!
//! - Unique paths: `name.txt`, `name_1.txt`, `name_2.txt`, ...
//! - Tracked file creation with cleanup on drop
//! - Recursive zip archives that keep the relative directory layout
//! - Timestamped backups of a file or directory
//! - Small line search and value validation utilities
//!
//! ## Example
//!
//! ```no_run
//! use zipstamp_core::{TrackedFileSet, backup, generate_unique_path};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Pick a free name for a scratch directory
//! let scratch = generate_unique_path("scratch", None)?;
//! std::fs::create_dir(&scratch)?;
//!
//! // Files created here are removed when `files` is dropped
//! let mut files = TrackedFileSet::new();
//! files.create_files_from_dict([("a.txt", "x")], Some(scratch.as_path()))?;
//!
//! // Zip the directory into ./scratch_<timestamp>.zip
//! let artifact = backup(&scratch, Some(Path::new(".")))?;
//! println!("Wrote {}", artifact.archive.display());
//! # Ok(())
//! # }
//! ```

mod archive;
mod backup;
mod error;
mod search;
mod tracked;
mod unique;
mod validation;
mod walk;

pub use archive::{ArchiveStats, zip_dir, zip_file};
pub use backup::{BackupArtifact, backup, backup_at, format_timestamp};
pub use error::{Error, Result};
pub use search::{LineCache, is_pattern_in_file, is_text_in_file};
pub use tracked::{DEFAULT_FILE_NAME, TrackedFileSet, remove_files, touch};
pub use unique::generate_unique_path;
pub use validation::{Rule, Validator, ValueKind};
pub use walk::collect_file_paths;
