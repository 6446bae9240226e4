//! # DEPLINKS
//!
//! Fast file-to-file dependency link extraction for Go projects.
//!
//! DEPLINKS walks a Go project tree, parses every internal package, and
//! emits a deduplicated list of directed links "file A references a
//! declaration defined in file B" for an external graph or visualization
//! consumer.
//!
//! ## Pipeline
//!
//! 1. **Discovery**: find every directory holding `.go` files, pruning
//!    `.git` and `vendor` subtrees.
//! 2. **Parsing**: parse each directory into per-file facts (package name,
//!    imports, top-level declarations, references), memoized per directory.
//! 3. **Resolution**: build the package symbol table, then resolve each
//!    file's qualified and unqualified references against it.
//!
//! Resolution is approximate: there is no type checking, extra edges are
//! preferred over missed edges, and non-compiling input degrades to fewer
//! links instead of failing the run.

pub mod core;
pub mod formatters;
pub mod parsers;
