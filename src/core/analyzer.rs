use anyhow::{Context, Result};
use std::path::Path;

use super::graph::{Link, LinkSet};
use super::resolver::{self, SymbolTable};
use super::scanner::DirectoryScanner;
use crate::parsers::cache::ParseCache;

/// Orchestrates the discovery, parsing and resolution passes over one
/// project root.
pub struct LinkAnalyzer {
    scanner: DirectoryScanner,
}

impl LinkAnalyzer {
    pub fn new() -> Self {
        Self {
            scanner: DirectoryScanner::new(),
        }
    }

    /// Determines every file-to-file dependency link under `root`. Both
    /// endpoints of each link are relative to `root` with forward-slash
    /// separators. The order of links is not deterministic; sort before
    /// asserting equality.
    pub fn determine_links(&self, root: &Path) -> Result<Vec<Link>> {
        let root = std::path::absolute(root)
            .with_context(|| format!("failed to absolutize {}", root.display()))?;

        let dirs = self.scanner.scan(&root)?;

        // The cache lives for exactly one analysis; every pass re-fetches
        // parsed directories through it and nothing survives the call.
        let cache = ParseCache::new(&root);
        cache.warm(&dirs)?;

        let symbols = SymbolTable::build(&dirs, &cache)?;

        let mut links = LinkSet::new();
        let usages = resolver::record_usages(&dirs, &cache, &symbols, &mut links)?;
        resolver::correlate(&usages, &symbols, &mut links);

        Ok(links.into_links(&root))
    }
}
