use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("tree-sitter produced no syntax tree"))
    }
}

/// Buffered whole-file read sized to the file for better I/O throughput.
pub fn read_source(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader =
        BufReader::with_capacity(if file_size < 8192 { file_size } else { 8192 }, file);

    let mut content = String::with_capacity(file_size);
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn find_child_by_kind<'a>(node: &'a TSNode, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            return Some(child);
        }
    }
    None
}
