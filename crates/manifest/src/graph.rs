use crate::device::DeviceMap;
use crate::node::{names, ManifestNode};
use crate::snapshot::GraphSnapshot;
use crate::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Handle to a node inside a [`ManifestGraph`]. Only valid for the graph
/// that produced it.
pub type NodeRef = NodeIndex;

/// Immutable manifest graph with the query surface the resolution engine
/// consumes.
///
/// Nodes are stored in document order (pre-order of the manifest tree);
/// edges point parent -> child. Hot lookups (by id, by tag) go through
/// indexes kept beside the graph, colder queries scan.
pub struct ManifestGraph {
    graph: DiGraph<ManifestNode, ()>,

    /// id attribute -> node, unique per id-bearing node
    id_index: HashMap<String, NodeIndex>,

    /// tag -> nodes carrying it, in document order
    tag_index: HashMap<String, Vec<NodeIndex>>,

    device_map: DeviceMap,

    /// Catalog root the manifest's build-item paths are relative to
    relative_root: Option<String>,
}

impl ManifestGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<ManifestNode, ()>,
        id_index: HashMap<String, NodeIndex>,
        tag_index: HashMap<String, Vec<NodeIndex>>,
        device_map: DeviceMap,
        relative_root: Option<String>,
    ) -> Self {
        Self {
            graph,
            id_index,
            tag_index,
            device_map,
            relative_root,
        }
    }

    /// Load a graph from a JSON snapshot file.
    pub fn from_snapshot_path(path: impl AsRef<Path>) -> Result<Self> {
        GraphSnapshot::from_path(path)?.into_graph()
    }

    pub fn node(&self, node: NodeRef) -> &ManifestNode {
        &self.graph[node]
    }

    pub fn tag(&self, node: NodeRef) -> &str {
        &self.graph[node].tag
    }

    pub fn attr(&self, node: NodeRef, name: &str) -> Option<&str> {
        self.graph[node].attr(name)
    }

    /// All nodes with the given tag whose attribute `attr` equals `value`,
    /// in document order.
    pub fn find_nodes(&self, tag: &str, attr: &str, value: &str) -> Vec<NodeRef> {
        self.tag_index
            .get(tag)
            .map(|nodes| {
                nodes
                    .iter()
                    .copied()
                    .filter(|&n| self.graph[n].attr(attr) == Some(value))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All nodes of any tag whose attribute `attr` equals `value`, in
    /// document order.
    pub fn find_nodes_with_attr_value(&self, attr: &str, value: &str) -> Vec<NodeRef> {
        self.graph
            .node_indices()
            .filter(|&n| self.graph[n].attr(attr) == Some(value))
            .collect()
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
    }

    /// Nearest node on the self-or-ancestor chain carrying attribute `attr`.
    pub fn nearest_with_attr(&self, node: NodeRef, attr: &str) -> Option<NodeRef> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.graph[n].attr(attr).is_some() {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Direct children in document order.
    pub fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        // petgraph lists neighbors most-recently-added first
        let mut children: Vec<NodeRef> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        children.reverse();
        children
    }

    /// All descendants of `node` (excluding `node` itself) in document order.
    pub fn descendants(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef> = self.children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            let children = self.children(n);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// First descendant (document order, excluding `node`) with the given
    /// tag whose attribute `attr` equals `value`.
    pub fn first_descendant(
        &self,
        node: NodeRef,
        tag: &str,
        attr: &str,
        value: &str,
    ) -> Option<NodeRef> {
        self.descendants(node).into_iter().find(|&n| {
            self.graph[n].tag == tag && self.graph[n].attr(attr) == Some(value)
        })
    }

    pub fn lookup_id(&self, id: &str) -> Option<NodeRef> {
        self.id_index.get(id).copied()
    }

    /// Ids of every node carrying the given tag.
    pub fn ids_of_tag(&self, tag: &str) -> BTreeSet<String> {
        self.tag_index
            .get(tag)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter_map(|&n| self.graph[n].attr(names::ID))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn device_groups(&self, mcu: &str) -> Option<&[String]> {
        self.device_map.groups_for(mcu)
    }

    pub fn relative_root(&self) -> Option<&str> {
        self.relative_root.as_deref()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use crate::{names, GraphBuilder, ManifestNode};
    use pretty_assertions::assert_eq;

    fn node(tag: &str, attrs: &[(&str, &str)]) -> ManifestNode {
        let mut n = ManifestNode::new(tag);
        for (name, value) in attrs {
            n = n.with_attr(*name, *value);
        }
        n
    }

    #[test]
    fn finds_nodes_by_tag_and_attribute() {
        let mut b = GraphBuilder::new();
        let root = b.add_root(node("asf", &[])).unwrap();
        let module = b
            .add_child(root, node("module", &[("id", "m1"), ("type", "driver")]))
            .unwrap();
        b.add_child(module, node("build", &[("value", "src/drv.c")]))
            .unwrap();
        b.add_child(module, node("build", &[("value", "src/drv.h")]))
            .unwrap();
        let graph = b.finish();

        let hits = graph.find_nodes("build", names::VALUE, "src/drv.c");
        assert_eq!(hits.len(), 1);
        assert_eq!(graph.attr(hits[0], names::VALUE), Some("src/drv.c"));
        assert!(graph.find_nodes("build", names::VALUE, "missing.c").is_empty());
    }

    #[test]
    fn nearest_with_attr_walks_self_then_ancestors() {
        let mut b = GraphBuilder::new();
        let root = b.add_root(node("asf", &[])).unwrap();
        let module = b
            .add_child(root, node("module", &[("id", "m1"), ("type", "driver")]))
            .unwrap();
        let build = b
            .add_child(module, node("build", &[("value", "src/drv.c")]))
            .unwrap();
        let graph = b.finish();

        let owner = graph.nearest_with_attr(build, names::ID).unwrap();
        assert_eq!(graph.attr(owner, names::ID), Some("m1"));
        // self-or-ancestor: an id-bearing node resolves to itself
        assert_eq!(graph.nearest_with_attr(module, names::ID), Some(module));
        assert_eq!(graph.nearest_with_attr(root, names::ID), None);
    }

    #[test]
    fn children_and_descendants_keep_document_order() {
        let mut b = GraphBuilder::new();
        let root = b.add_root(node("asf", &[])).unwrap();
        let first = b.add_child(root, node("module", &[("id", "a")])).unwrap();
        b.add_child(first, node("build", &[("value", "a.c")])).unwrap();
        b.add_child(root, node("module", &[("id", "b")])).unwrap();
        let graph = b.finish();

        let child_ids: Vec<_> = graph
            .children(root)
            .into_iter()
            .map(|n| graph.attr(n, names::ID).unwrap().to_owned())
            .collect();
        assert_eq!(child_ids, vec!["a".to_owned(), "b".to_owned()]);

        let tags: Vec<_> = graph
            .descendants(root)
            .into_iter()
            .map(|n| graph.tag(n).to_owned())
            .collect();
        assert_eq!(
            tags,
            vec!["module".to_owned(), "build".to_owned(), "module".to_owned()]
        );
    }

    #[test]
    fn ids_of_tag_collects_only_id_bearing_nodes() {
        let mut b = GraphBuilder::new();
        let root = b.add_root(node("asf", &[])).unwrap();
        b.add_child(root, node("project", &[("id", "p1")])).unwrap();
        b.add_child(root, node("project", &[("id", "p2")])).unwrap();
        b.add_child(root, node("project", &[])).unwrap();
        let graph = b.finish();

        let ids = graph.ids_of_tag("project");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("p1") && ids.contains("p2"));
    }
}
