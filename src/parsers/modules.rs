use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Module context derived from a `go.mod` manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Import path declared by the `module` directive.
    pub module_path: String,
    /// Directory holding the manifest; anchors package path computation.
    pub module_root: PathBuf,
}

/// Searches for a `go.mod` starting at `dir` and walking up to `root`.
/// Returns `Ok(None)` when no manifest exists in that range, which is
/// valid input: some projects are analyzed without module context. Read
/// and stat failures other than absence are errors.
pub fn resolve_module(root: &Path, dir: &Path) -> Result<Option<ModuleInfo>> {
    let mut current = dir.to_path_buf();
    loop {
        let manifest = current.join("go.mod");
        match fs::metadata(&manifest) {
            Ok(meta) if meta.is_file() => {
                let content = fs::read_to_string(&manifest)
                    .with_context(|| format!("failed to read {}", manifest.display()))?;
                return Ok(Some(ModuleInfo {
                    module_path: module_path(&content),
                    module_root: current,
                }));
            }
            // A directory named go.mod is not a manifest.
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to stat {}", manifest.display()));
            }
        }

        if current == root {
            return Ok(None);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Ok(None),
        }
    }
}

/// Extracts the module path token from `go.mod` content, ignoring every
/// other directive. Handles line comments and the quoted form. Returns an
/// empty string when no module directive is present.
pub fn module_path(content: &str) -> String {
    for line in content.lines() {
        let line = line.split("//").next().unwrap_or("").trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
            // Some other token that merely begins with "module".
            continue;
        }
        let token = rest.trim().trim_matches('"');
        if !token.is_empty() {
            return token.to_string();
        }
    }
    String::new()
}
