//! Filesystem walking.

use crate::error::Result;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Build a walker over the whole tree under `root`.
///
/// Every filter is off: hidden files and files listed in `.gitignore` are
/// visited too. Symlinks are reported but not followed. Siblings come out
/// sorted by name so archives are reproducible.
pub(crate) fn tree_walker(root: &Path) -> ignore::WalkBuilder {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    builder
}

/// Collect every file under `dir_paths`.
///
/// When `extensions` is given, only files whose extension (without the dot)
/// is in the set are returned. Subtrees rooted at any of `excluded_dirs` are
/// not descended into.
pub fn collect_file_paths<D, P>(
    dir_paths: D,
    extensions: Option<&HashSet<String>>,
    excluded_dirs: &[PathBuf],
) -> Result<BTreeSet<PathBuf>>
where
    D: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut paths = BTreeSet::new();

    for dir in dir_paths {
        let excluded: Vec<PathBuf> = excluded_dirs.to_vec();
        let walker = tree_walker(dir.as_ref())
            .filter_entry(move |entry| !excluded.iter().any(|ex| entry.path() == ex))
            .build();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let wanted = match extensions {
                None => true,
                Some(exts) => path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| exts.contains(e)),
            };
            if wanted {
                paths.insert(path.to_path_buf());
            }
        }
    }

    Ok(paths)
}
