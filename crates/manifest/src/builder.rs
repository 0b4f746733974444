use crate::device::DeviceMap;
use crate::error::{ManifestError, Result};
use crate::graph::{ManifestGraph, NodeRef};
use crate::node::{names, ManifestNode};
use petgraph::graph::DiGraph;
use std::collections::HashMap;

/// Builds a [`ManifestGraph`] node by node, maintaining the id and tag
/// indexes as it goes. Used by the snapshot loader and by tests/tooling
/// that construct graphs programmatically.
pub struct GraphBuilder {
    graph: DiGraph<ManifestNode, ()>,
    id_index: HashMap<String, NodeRef>,
    tag_index: HashMap<String, Vec<NodeRef>>,
    device_map: DeviceMap,
    relative_root: Option<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_index: HashMap::new(),
            tag_index: HashMap::new(),
            device_map: DeviceMap::new(),
            relative_root: None,
        }
    }

    /// Record the catalog root that build-item paths are relative to.
    pub fn set_relative_root(&mut self, root: impl Into<String>) -> &mut Self {
        self.relative_root = Some(root.into());
        self
    }

    /// Register the hardware groups an MCU belongs to.
    pub fn add_device_groups(&mut self, mcu: impl Into<String>, groups: Vec<String>) -> &mut Self {
        self.device_map.insert(mcu, groups);
        self
    }

    /// Add a top-level node (no parent).
    pub fn add_root(&mut self, node: ManifestNode) -> Result<NodeRef> {
        self.insert(node)
    }

    /// Add a node below `parent`. Children must be added in document order.
    pub fn add_child(&mut self, parent: NodeRef, node: ManifestNode) -> Result<NodeRef> {
        let idx = self.insert(node)?;
        self.graph.add_edge(parent, idx, ());
        Ok(idx)
    }

    fn insert(&mut self, node: ManifestNode) -> Result<NodeRef> {
        if let Some(id) = node.attr(names::ID) {
            if self.id_index.contains_key(id) {
                return Err(ManifestError::DuplicateId(id.to_owned()));
            }
        }

        let tag = node.tag.clone();
        let id = node.attr(names::ID).map(str::to_owned);
        let idx = self.graph.add_node(node);

        // Update indices
        if let Some(id) = id {
            self.id_index.insert(id, idx);
        }
        self.tag_index.entry(tag).or_default().push(idx);

        Ok(idx)
    }

    pub fn finish(self) -> ManifestGraph {
        ManifestGraph::from_parts(
            self.graph,
            self.id_index,
            self.tag_index,
            self.device_map,
            self.relative_root,
        )
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_duplicate_ids() {
        let mut b = GraphBuilder::new();
        let root = b.add_root(ManifestNode::new("asf")).unwrap();
        b.add_child(root, ManifestNode::new("module").with_attr("id", "m1"))
            .unwrap();
        let err = b
            .add_child(root, ManifestNode::new("module").with_attr("id", "m1"))
            .unwrap_err();

        assert!(matches!(err, ManifestError::DuplicateId(id) if id == "m1"));
    }

    #[test]
    fn carries_root_and_device_map_into_graph() {
        let mut b = GraphBuilder::new();
        b.set_relative_root("avr32/drivers");
        b.add_device_groups("uc3a0512", vec!["uc3a".to_owned(), "uc3".to_owned()]);
        b.add_root(ManifestNode::new("asf")).unwrap();
        let graph = b.finish();

        assert_eq!(graph.relative_root(), Some("avr32/drivers"));
        assert_eq!(
            graph.device_groups("uc3a0512"),
            Some(&["uc3a".to_owned(), "uc3".to_owned()][..])
        );
        assert_eq!(graph.device_groups("atmega328"), None);
    }
}
