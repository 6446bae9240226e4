use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names whose entire subtree is excluded from analysis.
/// Comparison is by exact path segment, never substring.
const SKIPPED_DIRS: &[&str] = &[".git", "vendor"];

/// Finds every directory under a root that holds Go source files.
pub struct DirectoryScanner;

impl DirectoryScanner {
    pub fn new() -> Self {
        Self
    }

    /// Walks `root` and returns the deduplicated set of directories
    /// containing at least one `.go` file, in no particular order. A
    /// failure to read the root is an error; an unreadable entry deeper
    /// in the tree skips that subtree and the walk continues.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_skipped(entry));
        for entry in walker {
            match entry {
                Ok(entry) => entries.push(entry),
                Err(err) if err.depth() == 0 => {
                    return Err(err).with_context(|| format!("failed to walk {}", root.display()));
                }
                Err(err) => {
                    eprintln!("Warning: skipping unreadable entry: {err}");
                }
            }
        }

        let dirs: HashSet<PathBuf> = entries
            .par_iter()
            .filter_map(|entry| {
                if !entry.file_type().is_file() {
                    return None;
                }
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("go") {
                    return None;
                }
                path.parent().map(Path::to_path_buf)
            })
            .collect();

        Ok(dirs.into_iter().collect())
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| SKIPPED_DIRS.contains(&name))
}
