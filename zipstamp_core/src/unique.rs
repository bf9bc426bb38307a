//! Collision-free path allocation.
//!
//! Uniqueness is checked live against the filesystem. Nothing is created, so a
//! path returned here can still be taken by another writer before the caller
//! uses it. [`TrackedFileSet`](crate::TrackedFileSet) closes that gap with
//! exclusive creation.

use crate::error::Result;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Return an absolute path based on `base_path` that does not exist yet.
///
/// Relative `base_path` values are resolved against `parent_dir`, or the
/// current working directory when `parent_dir` is `None`. If the resolved path
/// is free it is returned as is; otherwise `_1`, `_2`, ... is inserted before
/// the extension until a free name is found (`notes.txt` -> `notes_1.txt`).
pub fn generate_unique_path(
    base_path: impl AsRef<Path>,
    parent_dir: Option<&Path>,
) -> Result<PathBuf> {
    let parent = match parent_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let base = std::path::absolute(parent.join(base_path.as_ref()))?;

    if !is_taken(&base)? {
        return Ok(base);
    }

    let mut count: u64 = 0;
    loop {
        count += 1;
        let candidate = numbered_candidate(&base, count);
        if !is_taken(&candidate)? {
            tracing::debug!(path = %candidate.display(), "allocated numbered path");
            return Ok(candidate);
        }
    }
}

/// Whether anything occupies `path`. Symlinks are not followed, so a dangling
/// link still counts as taken.
fn is_taken(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Build `<stem>_<n>.<ext>` next to `path`.
fn numbered_candidate(path: &Path, n: u64) -> PathBuf {
    let mut name = OsString::from(path.file_stem().unwrap_or_default());
    name.push(format!("_{n}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
