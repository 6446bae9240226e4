use anyhow::{Context, Result};
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::common::read_source;
use super::{go, modules, ParsedDir, SourceFile};

/// Thread-safe per-directory parse cache, scoped to one analysis run.
///
/// A directory parses once; every later request returns the same shared
/// unit. Directories whose files do not parse as valid Go are cached as
/// `None` so they are neither reparsed nor treated as failures: callers
/// skip them. I/O errors are the only failures that propagate.
pub struct ParseCache {
    root: PathBuf,
    units: DashMap<PathBuf, Option<Arc<ParsedDir>>>,
}

impl ParseCache {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            units: DashMap::new(),
        }
    }

    /// Parses `dir` into a compilation unit, memoized for the lifetime of
    /// this cache. Repeated calls return the identical `Arc`.
    pub fn parse(&self, dir: &Path) -> Result<Option<Arc<ParsedDir>>> {
        if let Some(cached) = self.units.get(dir) {
            return Ok(cached.value().clone());
        }
        let unit = self.parse_uncached(dir)?;
        // Under a concurrent warm-up the first insert wins, so every caller
        // sees the same unit.
        let entry = self.units.entry(dir.to_path_buf()).or_insert(unit);
        Ok(entry.value().clone())
    }

    /// Parses every directory in parallel so the sequential resolution
    /// passes run against a warm cache. The first I/O error aborts the
    /// warm-up.
    pub fn warm(&self, dirs: &[PathBuf]) -> Result<()> {
        dirs.par_iter()
            .try_for_each(|dir| self.parse(dir).map(|_| ()))
    }

    fn parse_uncached(&self, dir: &Path) -> Result<Option<Arc<ParsedDir>>> {
        let module = modules::resolve_module(&self.root, dir)?;
        let (module_path, module_root) = match module {
            Some(info) => (info.module_path, info.module_root),
            None => (String::new(), PathBuf::new()),
        };

        let mut go_files = Vec::new();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read directory {}", dir.display()))?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("failed to stat {}", entry.path().display()))?;
            let path = entry.path();
            if file_type.is_file() && path.extension().and_then(|e| e.to_str()) == Some("go") {
                go_files.push(path);
            }
        }
        // Stable processing order, so the winner of duplicate top-level
        // names does not depend on readdir order.
        go_files.sort();

        let mut packages: HashMap<String, Vec<SourceFile>> = HashMap::new();
        for path in go_files {
            let source = read_source(&path)?;
            match go::parse_file(&path, &source)? {
                Some(file) => packages
                    .entry(file.package_name.clone())
                    .or_default()
                    .push(file),
                // One unparsable file disqualifies the whole directory,
                // matching go/parser.ParseDir semantics.
                None => return Ok(None),
            }
        }

        Ok(Some(Arc::new(ParsedDir {
            module_path,
            module_root,
            packages,
        })))
    }
}
