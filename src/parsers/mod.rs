pub mod cache;
pub mod common;
pub mod go;
pub mod modules;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One parsed directory: every `.go` file grouped by its declared package
/// name, plus the module context the directory resolves under. A directory
/// normally holds a single package, but more than one group is valid input
/// (external test packages, stray files) and all groups are recorded.
#[derive(Debug)]
pub struct ParsedDir {
    /// Module path declared in the nearest `go.mod`, empty when none exists.
    pub module_path: String,
    /// Directory containing that `go.mod`, empty when none exists.
    pub module_root: PathBuf,
    pub packages: HashMap<String, Vec<SourceFile>>,
}

impl ParsedDir {
    /// Canonical package path of `dir` under this unit's module: the module
    /// root prefix is replaced by the module path. Without module context
    /// the directory path itself is the package's identity.
    pub fn package_path(&self, dir: &Path) -> String {
        let dir = dir.to_string_lossy();
        let root = self.module_root.to_string_lossy();
        if root.is_empty() {
            return dir.into_owned();
        }
        dir.replace(root.as_ref(), &self.module_path)
    }
}

/// Per-file extraction result consumed by the resolution passes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package_name: String,
    /// Identifiers bound at package scope by this file: functions, types,
    /// constants and variables. Method names are receiver-scoped and are
    /// not included.
    pub declared: Vec<String>,
    pub imports: Vec<Import>,
    /// Identifiers referenced without a qualifier and not bound by any
    /// declaration visible in the file.
    pub free_idents: Vec<String>,
    /// `qualifier.name` references where the qualifier is a simple name.
    pub qualified_refs: Vec<QualifiedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `import "a/b"`: bound under the imported package's declared name.
    Default,
    /// `import x "a/b"`.
    Named(String),
    /// `import . "a/b"`: the package's identifiers join the file's
    /// unqualified namespace.
    Dot,
    /// `import _ "a/b"`: side-effect only, binds nothing.
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedRef {
    pub qualifier: String,
    pub name: String,
}
