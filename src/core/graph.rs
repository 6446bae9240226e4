use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// A directed dependency edge between two files. Both endpoints are
/// root-relative paths with forward-slash separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
}

/// Edge accumulator holding at most one link per ordered (from, to) pair.
///
/// Files are nodes in a directed graph; an edge's presence is the dedup
/// key, so both resolution passes can write into the same set without
/// coordinating.
#[derive(Debug, Default)]
pub struct LinkSet {
    graph: DiGraph<PathBuf, ()>,
    nodes: HashMap<PathBuf, NodeIndex>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link, ignoring duplicates.
    pub fn add(&mut self, from: &Path, to: &Path) {
        let from = self.node(from);
        let to = self.node(to);
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Consumes the set into links with both endpoints rewritten relative
    /// to `root`. Order follows edge insertion and is not part of the
    /// contract.
    pub fn into_links(self, root: &Path) -> Vec<Link> {
        self.graph
            .edge_references()
            .map(|edge| Link {
                from: relative_to(root, &self.graph[edge.source()]),
                to: relative_to(root, &self.graph[edge.target()]),
            })
            .collect()
    }

    fn node(&mut self, path: &Path) -> NodeIndex {
        if let Some(&index) = self.nodes.get(path) {
            return index;
        }
        let index = self.graph.add_node(path.to_path_buf());
        self.nodes.insert(path.to_path_buf(), index);
        index
    }
}

fn relative_to(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    parts.join("/")
}
