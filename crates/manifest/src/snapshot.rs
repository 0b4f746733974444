use crate::builder::GraphBuilder;
use crate::graph::{ManifestGraph, NodeRef};
use crate::node::ManifestNode;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// JSON handoff format from the external manifest loader: the node tree plus
/// the device map and the catalog-relative root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Root the build-item paths were recorded relative to
    #[serde(default)]
    pub relative_root: Option<String>,

    /// MCU name -> hardware groups
    #[serde(default)]
    pub device_groups: BTreeMap<String, Vec<String>>,

    /// Top-level manifest nodes
    pub nodes: Vec<SnapshotNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub tag: String,

    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl GraphSnapshot {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Materialize the snapshot into a queryable graph. Fails on duplicate
    /// node ids.
    pub fn into_graph(self) -> Result<ManifestGraph> {
        let mut builder = GraphBuilder::new();
        if let Some(root) = self.relative_root {
            builder.set_relative_root(root);
        }
        for (mcu, groups) in self.device_groups {
            builder.add_device_groups(mcu, groups);
        }
        for node in self.nodes {
            add_subtree(&mut builder, None, node)?;
        }
        Ok(builder.finish())
    }
}

fn add_subtree(
    builder: &mut GraphBuilder,
    parent: Option<NodeRef>,
    snap: SnapshotNode,
) -> Result<()> {
    let node = ManifestNode {
        tag: snap.tag,
        attrs: snap.attrs,
    };
    let idx = match parent {
        Some(parent) => builder.add_child(parent, node)?,
        None => builder.add_root(node)?,
    };
    for child in snap.children {
        add_subtree(builder, Some(idx), child)?;
    }
    Ok(())
}
