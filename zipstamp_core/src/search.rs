//! Line-oriented text search over files.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Return true if any line of the file contains `text`.
pub fn is_text_in_file(text: &str, file_path: impl AsRef<Path>) -> Result<bool> {
    let reader = BufReader::new(File::open(file_path.as_ref())?);
    for line in reader.lines() {
        if line?.contains(text) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Return true if the regular expression `pattern` matches any line of the file.
///
/// Line terminators are stripped first, so `$` anchors at the end of a line.
pub fn is_pattern_in_file(pattern: &str, file_path: impl AsRef<Path>) -> Result<bool> {
    let regex = Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
    let reader = BufReader::new(File::open(file_path.as_ref())?);
    for line in reader.lines() {
        if regex.is_match(&line?) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Per-session cache of file lines.
///
/// Each file is read at most once per cache (once more for the lowercased
/// view). Entries are never refreshed on their own; call
/// [`LineCache::invalidate`] after a file changes, or drop the cache.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: HashMap<PathBuf, Arc<[String]>>,
    lowered: HashMap<PathBuf, Arc<[String]>>,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of the file, each keeping its line terminator.
    pub fn lines(&mut self, file_path: impl AsRef<Path>) -> Result<Arc<[String]>> {
        let path = file_path.as_ref();
        if let Some(lines) = self.lines.get(path) {
            return Ok(Arc::clone(lines));
        }

        let lines: Arc<[String]> = read_lines(path)?.into();
        self.lines.insert(path.to_path_buf(), Arc::clone(&lines));
        Ok(lines)
    }

    /// Lowercased lines of the file.
    pub fn lowered_lines(&mut self, file_path: impl AsRef<Path>) -> Result<Arc<[String]>> {
        let path = file_path.as_ref();
        if let Some(lines) = self.lowered.get(path) {
            return Ok(Arc::clone(lines));
        }

        let lines: Arc<[String]> = read_lines(path)?
            .into_iter()
            .map(|line| line.to_lowercase())
            .collect();
        self.lowered.insert(path.to_path_buf(), Arc::clone(&lines));
        Ok(lines)
    }

    /// Forget both views of one file.
    pub fn invalidate(&mut self, file_path: impl AsRef<Path>) {
        let path = file_path.as_ref();
        self.lines.remove(path);
        self.lowered.remove(path);
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lowered.clear();
    }

    /// Number of cached views (plain and lowercased are counted separately).
    pub fn len(&self) -> usize {
        self.lines.len() + self.lowered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.lowered.is_empty()
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.split_inclusive('\n').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracked::TrackedFileSet;
    use tempfile::TempDir;

    const DROIDS: &str = "[These] are not the droids you're looking for.";

    fn droid_file(temp_dir: &TempDir, files: &mut TrackedFileSet) -> PathBuf {
        let path = files.create_unique_file(None, Some(temp_dir.path())).unwrap();
        fs::write(&path, DROIDS).unwrap();
        path
    }

    #[test]
    fn test_is_text_in_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut files = TrackedFileSet::new();
        let path = droid_file(&temp_dir, &mut files);

        assert!(!is_text_in_file("not in file", &path).unwrap());
        assert!(is_text_in_file("roids y", &path).unwrap());
    }

    #[test]
    fn test_is_pattern_in_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut files = TrackedFileSet::new();
        let path = droid_file(&temp_dir, &mut files);

        let pattern = format!("{}.*for.$", regex::escape("hese]"));
        assert!(is_pattern_in_file(&pattern, &path).unwrap());
        assert!(!is_pattern_in_file("^a", &path).unwrap());
    }

    #[test]
    fn test_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let mut files = TrackedFileSet::new();
        let path = droid_file(&temp_dir, &mut files);

        let result = is_pattern_in_file("(unclosed", &path);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = is_text_in_file("x", temp_dir.path().join("missing"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_line_cache_keeps_terminators() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lines.txt");
        fs::write(&path, "hurble\ndurble").unwrap();

        let mut cache = LineCache::new();
        let lines = cache.lines(&path).unwrap();
        assert_eq!(&*lines, &["hurble\n".to_string(), "durble".to_string()]);
    }

    #[test]
    fn test_line_cache_lowered() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lines.txt");
        fs::write(&path, "Hurble\nDURBLE\n").unwrap();

        let mut cache = LineCache::new();
        let lines = cache.lowered_lines(&path).unwrap();
        assert_eq!(&*lines, &["hurble\n".to_string(), "durble\n".to_string()]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_line_cache_serves_stale_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lines.txt");
        fs::write(&path, "old\n").unwrap();

        let mut cache = LineCache::new();
        assert_eq!(cache.lines(&path).unwrap()[0], "old\n");

        fs::write(&path, "new\n").unwrap();
        assert_eq!(cache.lines(&path).unwrap()[0], "old\n");

        cache.invalidate(&path);
        assert_eq!(cache.lines(&path).unwrap()[0], "new\n");

        cache.clear();
        assert!(cache.is_empty());
    }
}
