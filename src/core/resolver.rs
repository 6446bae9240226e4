use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::graph::LinkSet;
use crate::parsers::cache::ParseCache;
use crate::parsers::{ImportKind, SourceFile};

/// Package-level symbol table built by the first pass: which file defines
/// each top-level identifier of each internal package, plus the parallel
/// package path to declared package name table. The name table exists
/// because a package's short name is not reliably the last segment of its
/// import path.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, HashMap<String, PathBuf>>,
    package_names: HashMap<String, String>,
}

impl SymbolTable {
    /// First pass over the discovered directories. Purely additive and
    /// order-independent across directories; directories without a
    /// compilation unit are skipped.
    pub fn build(dirs: &[PathBuf], cache: &ParseCache) -> Result<SymbolTable> {
        let mut table = SymbolTable::default();
        for dir in dirs {
            let Some(unit) = cache.parse(dir)? else {
                continue;
            };
            let package_path = unit.package_path(dir);
            for (package_name, files) in &unit.packages {
                table
                    .package_names
                    .insert(package_path.clone(), package_name.clone());
                let symbols = table.symbols.entry(package_path.clone()).or_default();
                for file in files {
                    for ident in &file.declared {
                        // Two files declaring the same name is illegal Go;
                        // the later file wins and no diagnostic is raised.
                        symbols.insert(ident.clone(), file.path.clone());
                    }
                }
            }
        }
        Ok(table)
    }

    pub fn lookup(&self, package_path: &str, ident: &str) -> Option<&Path> {
        self.symbols
            .get(package_path)?
            .get(ident)
            .map(PathBuf::as_path)
    }

    pub fn package_name(&self, package_path: &str) -> Option<&str> {
        self.package_names.get(package_path).map(String::as_str)
    }

    pub fn package_symbols(&self, package_path: &str) -> Option<&HashMap<String, PathBuf>> {
        self.symbols.get(package_path)
    }
}

/// Per-file import bindings: declared local name to internal package path,
/// plus the dot-imported package paths whose identifiers join the file's
/// unqualified namespace. Built fresh for each file and discarded once its
/// usages are recorded.
#[derive(Debug, Default)]
pub struct FileAliases {
    names: HashMap<String, String>,
    dot_imports: Vec<String>,
}

impl FileAliases {
    pub fn build(file: &SourceFile, module_path: &str, symbols: &SymbolTable) -> FileAliases {
        let mut aliases = FileAliases::default();
        for import in &file.imports {
            // Imports outside the module can never produce an edge.
            if !import.path.contains(module_path) {
                continue;
            }
            match &import.kind {
                ImportKind::Named(name) => {
                    aliases.names.insert(name.clone(), import.path.clone());
                }
                ImportKind::Dot => aliases.dot_imports.push(import.path.clone()),
                ImportKind::Blank => {}
                ImportKind::Default => {
                    // The bound name is the package's declared name from
                    // pass 1. A miss means the import is not an internal
                    // package we parsed, so it binds nothing.
                    if let Some(name) = symbols.package_name(&import.path) {
                        aliases.names.insert(name.to_string(), import.path.clone());
                    }
                }
            }
        }
        aliases
    }

    pub fn resolve(&self, qualifier: &str) -> Option<&str> {
        self.names.get(qualifier).map(String::as_str)
    }

    pub fn dot_imports(&self) -> &[String] {
        &self.dot_imports
    }
}

/// Qualified references observed per file, keyed by the internal package
/// path each reference resolved to through that file's alias table.
pub type UsageMap = HashMap<PathBuf, HashMap<String, HashSet<String>>>;

/// Second pass. Unqualified references resolve immediately: every free
/// identifier is checked against the file's own package and every dot
/// import, and each hit emits a link. All candidates are checked rather
/// than stopping at the first hit, so an ambiguous identifier yields an
/// edge per defining package. Qualified references only accumulate here;
/// their defining files are looked up globally in the third pass.
pub fn record_usages(
    dirs: &[PathBuf],
    cache: &ParseCache,
    symbols: &SymbolTable,
    links: &mut LinkSet,
) -> Result<UsageMap> {
    let mut usages = UsageMap::new();
    for dir in dirs {
        let Some(unit) = cache.parse(dir)? else {
            continue;
        };
        let package_path = unit.package_path(dir);
        for files in unit.packages.values() {
            for file in files {
                let aliases = FileAliases::build(file, &unit.module_path, symbols);

                let mut candidates = vec![package_path.clone()];
                candidates.extend(aliases.dot_imports().iter().cloned());
                for ident in &file.free_idents {
                    for candidate in &candidates {
                        if let Some(to) = symbols.lookup(candidate, ident) {
                            links.add(&file.path, to);
                        }
                    }
                }

                for reference in &file.qualified_refs {
                    let Some(target) = aliases.resolve(&reference.qualifier) else {
                        continue;
                    };
                    usages
                        .entry(file.path.clone())
                        .or_default()
                        .entry(target.to_string())
                        .or_default()
                        .insert(reference.name.clone());
                }
            }
        }
    }
    Ok(usages)
}

/// Third pass: cross-reference accumulated qualified usages against the
/// symbol table. Identifiers missing from the target package are dropped
/// silently; that is the expected outcome for non-compiling input, not a
/// failure.
pub fn correlate(usages: &UsageMap, symbols: &SymbolTable, links: &mut LinkSet) {
    for (from, packages) in usages {
        for (package_path, idents) in packages {
            let Some(defined) = symbols.package_symbols(package_path) else {
                continue;
            };
            for ident in idents {
                if let Some(to) = defined.get(ident) {
                    links.add(from, to);
                }
            }
        }
    }
}
