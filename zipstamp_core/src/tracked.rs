//! Tracked file creation with guaranteed cleanup.

use crate::error::{Error, Result};
use crate::unique::generate_unique_path;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File name used by [`TrackedFileSet::create_unique_file`] when none is given.
pub const DEFAULT_FILE_NAME: &str = "test_file.txt";

/// Records every file it creates so they can all be removed again.
///
/// Dropping the set deletes everything it still tracks, including when the
/// owning scope unwinds from a panic. Call [`TrackedFileSet::keep`] to stop
/// tracking without deleting.
#[derive(Debug, Default)]
pub struct TrackedFileSet {
    created: Vec<PathBuf>,
}

impl TrackedFileSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths created so far, in creation order.
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    /// Create an empty file (or bump the mtime of an existing one) and track it.
    ///
    /// Relative paths are tracked in absolute form, so cleanup does not depend
    /// on the working directory at that point.
    pub fn touch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = std::path::absolute(path.as_ref())?;
        touch(&path)?;
        self.created.push(path);
        Ok(())
    }

    /// Create a new, uniquely named empty file and return its path.
    ///
    /// `base_name` defaults to [`DEFAULT_FILE_NAME`] and `dir_path` to the
    /// current directory. The file is created exclusively: if another writer
    /// takes the allocated name first, allocation is retried.
    pub fn create_unique_file(
        &mut self,
        base_name: Option<&str>,
        dir_path: Option<&Path>,
    ) -> Result<PathBuf> {
        let dir = resolve_dir(dir_path)?;
        let base_name = base_name.unwrap_or(DEFAULT_FILE_NAME);

        loop {
            let path = generate_unique_path(base_name, Some(dir.as_path()))?;
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    self.created.push(path.clone());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "lost creation race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Write each `(relative path, content)` pair under `dir_path`.
    ///
    /// Fails with [`Error::AlreadyExists`] on the first target that already
    /// exists; nothing is overwritten. Entries written before the failure stay
    /// on disk and stay tracked.
    pub fn create_files_from_dict<I, P, C>(
        &mut self,
        entries: I,
        dir_path: Option<&Path>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<Path>,
        C: AsRef<[u8]>,
    {
        let dir = resolve_dir(dir_path)?;

        for (rel_path, content) in entries {
            let full_path = dir.join(rel_path.as_ref());
            if full_path.try_exists()? {
                return Err(Error::already_exists(full_path));
            }

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&full_path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    return Err(Error::already_exists(full_path));
                }
                Err(e) => return Err(e.into()),
            };
            self.created.push(full_path);
            file.write_all(content.as_ref())?;
        }

        Ok(())
    }

    /// Remove every tracked file and clear the set.
    ///
    /// Files that are already gone are skipped. Other failures are logged and
    /// do not stop the remaining deletions. Returns how many files were removed.
    pub fn delete_all_created_files(&mut self) -> usize {
        let mut removed = 0;
        for path in self.created.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to remove tracked file"
                    );
                }
            }
        }
        removed
    }

    /// Stop tracking all files without deleting them.
    pub fn keep(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.created)
    }
}

impl Drop for TrackedFileSet {
    fn drop(&mut self) {
        self.delete_all_created_files();
    }
}

/// Create an empty file at `path`, or set the modification time of an
/// existing one to now.
///
/// Existing files only need to be opened for reading, so read-only files can
/// be touched too.
pub fn touch(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::PermissionDenied && path.is_file() => {
            fs::File::open(path)?
        }
        Err(e) => return Err(e.into()),
    };
    file.set_modified(SystemTime::now())?;
    Ok(())
}

/// Delete each path, resolving relative ones under `parent_dir` (default: the
/// current directory).
///
/// Missing files are skipped. Returns the number of files removed.
pub fn remove_files<I, P>(paths: I, parent_dir: Option<&Path>) -> Result<usize>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let parent = resolve_dir(parent_dir)?;
    let mut removed = 0;

    for path in paths {
        match fs::remove_file(parent.join(path.as_ref())) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}

fn resolve_dir(dir_path: Option<&Path>) -> Result<PathBuf> {
    match dir_path {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}
