//! # Rescope Manifest
//!
//! Read-only query facade over an already-materialized component-catalog
//! manifest graph.
//!
//! ## Architecture
//!
//! ```text
//! GraphSnapshot (JSON)          GraphBuilder (programmatic)
//!     │                             │
//!     └──────────┬──────────────────┘
//!                ▼
//!         ManifestGraph (petgraph)
//!             ├─ Nodes: tagged attribute maps (project, module, require, build, ...)
//!             ├─ Edges: parent -> child document structure
//!             ├─ Indexes: id -> node, tag -> nodes
//!             └─ DeviceMap: mcu -> hardware groups
//! ```
//!
//! The graph is immutable once built; every query is read-only. Parsing the
//! manifest documents themselves happens upstream — this crate only consumes
//! the resulting snapshot.

mod builder;
mod device;
mod error;
mod graph;
mod node;
mod snapshot;

pub use builder::GraphBuilder;
pub use device::DeviceMap;
pub use error::{ManifestError, Result};
pub use graph::{ManifestGraph, NodeRef};
pub use node::{names, ManifestNode};
pub use snapshot::{GraphSnapshot, SnapshotNode};
