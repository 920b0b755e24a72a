//! Path-prefix tree built from the flat record list.
//!
//! Every cumulative prefix of a record's path becomes one node, keyed by the
//! exact prefix path. Leaf nodes carry the file size; intermediate nodes carry 0
//! and get their effective size from their descendants.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use smallvec::SmallVec;

use crate::models::record::FileRecord;

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub path: PathBuf,
    /// Display form of `path`.
    pub key: String,
    /// Own size: the file size for leaves, 0 for directory prefixes.
    pub size: u64,
    /// Number of path components in `path`, starting at 1.
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: SmallVec<[usize; 4]>,
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyGraph {
    nodes: Vec<HierarchyNode>,
    index: HashMap<PathBuf, usize>,
}

impl HierarchyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(records: &[FileRecord]) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.insert_path(&record.os_path, record.size_bytes);
        }
        tracing::debug!(
            nodes = graph.len(),
            records = records.len(),
            "hierarchy graph built"
        );
        graph
    }

    /// Add every prefix of `path` and link each one to the previous prefix.
    /// Existing nodes keep the size they were inserted with.
    pub fn insert_path(&mut self, path: &Path, size: u64) {
        let components: SmallVec<[_; 16]> = path.components().collect();
        let last = components.len().saturating_sub(1);

        let mut prefix = PathBuf::new();
        let mut parent: Option<usize> = None;
        for (i, component) in components.iter().enumerate() {
            prefix.push(component.as_os_str());
            let own_size = if i == last { size } else { 0 };
            let idx = self.get_or_insert(&prefix, own_size, i + 1, parent);
            parent = Some(idx);
        }
    }

    fn get_or_insert(
        &mut self,
        path: &Path,
        size: u64,
        depth: usize,
        parent: Option<usize>,
    ) -> usize {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(path.to_path_buf(), idx);
        self.nodes.push(HierarchyNode {
            path: path.to_path_buf(),
            key: path.to_string_lossy().into_owned(),
            size,
            depth,
            parent,
            children: SmallVec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(idx);
        }
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn index_of(&self, path: impl AsRef<Path>) -> Option<usize> {
        self.index.get(path.as_ref()).copied()
    }

    pub fn node(&self, path: impl AsRef<Path>) -> Option<&HierarchyNode> {
        self.index_of(path).map(|idx| &self.nodes[idx])
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].children
    }

    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.nodes[idx].parent
    }

    /// Nodes without a parent. A single walk always yields exactly one.
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// `(parent, child)` pairs, one per non-root node.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.parent.map(|p| (p, i)))
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.parent.is_some()).count()
    }

    /// Own size plus the size of every descendant, for each node.
    pub fn subtree_sizes(&self) -> Vec<u64> {
        let mut totals: Vec<u64> = self.nodes.iter().map(|n| n.size).collect();
        // Children are always inserted after their parent.
        for idx in (0..self.nodes.len()).rev() {
            if let Some(p) = self.nodes[idx].parent {
                totals[p] += totals[idx];
            }
        }
        totals
    }

    /// Sum of `size` over all descendants of `idx`, excluding `idx` itself.
    pub fn descendant_size(&self, idx: usize) -> u64 {
        let mut total = 0;
        let mut stack: Vec<usize> = self.nodes[idx].children.to_vec();
        while let Some(i) = stack.pop() {
            total += self.nodes[i].size;
            stack.extend_from_slice(&self.nodes[i].children);
        }
        total
    }

    /// Largest own size, i.e. the largest single file.
    pub fn max_size(&self) -> Option<u64> {
        self.nodes.iter().map(|n| n.size).max()
    }

    /// Color ratio per node, in node order.
    ///
    /// Nodes with a non-zero own size use it directly; all others use their
    /// descendant sum. Directory ratios may exceed 1. Returns `None` when the
    /// graph is empty; when every file is empty all ratios are 0.
    pub fn ratios(&self) -> Option<Vec<f64>> {
        let max = self.max_size()?;
        if max == 0 {
            return Some(vec![0.0; self.nodes.len()]);
        }

        let totals = self.subtree_sizes();
        let ratios = self
            .nodes
            .iter()
            .zip(totals)
            .map(|(node, subtree)| {
                let effective = if node.size > 0 {
                    node.size
                } else {
                    subtree
                };
                effective as f64 / max as f64
            })
            .collect();
        Some(ratios)
    }
}
