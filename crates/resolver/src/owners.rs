use crate::error::{ResolveError, Result};
use log::debug;
use rescope_manifest::{names, ManifestGraph, NodeRef};
use std::collections::BTreeSet;
use std::path::Path;

/// Maps changed paths to the graph ids that own them.
///
/// Every finder distinguishes "no owner known" (`None`, which the engine
/// turns into a full rebuild) from "owners found, possibly zero"
/// (`Some(set)`). Conflating the two would silently drop the conservative
/// fallback.
pub struct OwnerFinder<'a> {
    graph: &'a ManifestGraph,
}

impl<'a> OwnerFinder<'a> {
    pub fn new(graph: &'a ManifestGraph) -> Self {
        Self { graph }
    }

    /// Owners of an ordinary file, via exact build-item match.
    pub fn for_file(&self, path: &Path) -> Result<Option<BTreeSet<String>>> {
        let key = path_key(path);
        debug!("finding owner for file '{}'", key);

        let matches = self.graph.find_nodes(names::BUILD, names::VALUE, &key);
        if matches.is_empty() {
            return Ok(None);
        }

        let mut owners = BTreeSet::new();
        for build in matches {
            let id = owning_id(self.graph, build)?;
            debug!("  found '{}'", id);
            owners.insert(id);
        }
        Ok(Some(owners))
    }

    /// Directory-level fallback, invoked only when [`Self::for_file`] found
    /// nothing: match build items registered as the file's directory.
    pub fn for_file_extended(&self, path: &Path) -> Result<Option<BTreeSet<String>>> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => path_key(dir),
            _ => return Ok(None),
        };
        debug!("extended search for '{}' via directory '{}'", path_key(path), dir);

        let matches = self.graph.find_nodes(names::BUILD, names::VALUE, &dir);
        if matches.is_empty() {
            return Ok(None);
        }

        let mut owners = BTreeSet::new();
        for build in matches {
            let kind = self.graph.attr(build, names::TYPE).unwrap_or_default();
            let subkind = self.graph.attr(build, names::SUBTYPE).unwrap_or_default();

            if kind == names::MODULE_CONFIG && subkind == names::PATH {
                match self.module_config_owner(build, path)? {
                    Some(id) => {
                        owners.insert(id);
                    }
                    // Config header on disk but absent from the manifest:
                    // its impact cannot be bounded.
                    None => return Ok(None),
                }
            } else if kind == names::DISTRIBUTE && subkind == names::PATH {
                debug!("  distribute path '{}' cannot be bounded", dir);
                return Ok(None);
            }
            // other type/subtype combinations contribute nothing
        }
        Ok(Some(owners))
    }

    /// Owner of a module-config header: the module owning the matched
    /// directory build item, provided that module declares the header as a
    /// required header file.
    fn module_config_owner(&self, build: NodeRef, path: &Path) -> Result<Option<String>> {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Ok(None),
        };

        let owner = self
            .graph
            .nearest_with_attr(build, names::ID)
            .ok_or_else(|| ResolveError::NoOwningId(describe(self.graph, build)))?;
        let owner_id = self
            .graph
            .attr(owner, names::ID)
            .map(str::to_owned)
            .ok_or_else(|| ResolveError::NoOwningId(describe(self.graph, build)))?;

        debug!("  searching '{}' for required header '{}'", owner_id, name);
        let header = self
            .graph
            .first_descendant(owner, names::BUILD, names::VALUE, &name)
            .filter(|&n| {
                self.graph.attr(n, names::TYPE) == Some(names::MODULE_CONFIG)
                    && self.graph.attr(n, names::SUBTYPE) == Some(names::REQUIRED_HEADER_FILE)
            });

        match header {
            Some(_) => {
                debug!("  found module-config header in '{}'", owner_id);
                Ok(Some(owner_id))
            }
            None => {
                debug!("  no module-config header '{}' in '{}'", name, owner_id);
                Ok(None)
            }
        }
    }

    /// Ids materialized from a manifest file: every node whose `origin-file`
    /// equals the path, plus each such node's id-bearing descendants.
    pub fn for_manifest(&self, path: &Path) -> Option<BTreeSet<String>> {
        let key = path_key(path);
        debug!("finding ids originating from manifest '{}'", key);

        let origins = self
            .graph
            .find_nodes_with_attr_value(names::ORIGIN_FILE, &key);
        if origins.is_empty() {
            return None;
        }

        let mut ids = BTreeSet::new();
        for origin in origins {
            if let Some(id) = self.graph.attr(origin, names::ID) {
                ids.insert(id.to_owned());
            }
            for node in self.graph.descendants(origin) {
                if let Some(id) = self.graph.attr(node, names::ID) {
                    ids.insert(id.to_owned());
                }
            }
        }
        Some(ids)
    }
}

/// Id of the nearest self-or-ancestor id-bearing node. A node outside any
/// id-bearing subtree is a graph-consistency violation.
pub(crate) fn owning_id(graph: &ManifestGraph, node: NodeRef) -> Result<String> {
    graph
        .nearest_with_attr(node, names::ID)
        .and_then(|owner| graph.attr(owner, names::ID))
        .map(str::to_owned)
        .ok_or_else(|| ResolveError::NoOwningId(describe(graph, node)))
}

fn describe(graph: &ManifestGraph, node: NodeRef) -> String {
    let node = graph.node(node);
    match node.attr(names::VALUE).or_else(|| node.attr(names::IDREF)) {
        Some(detail) => format!("{} {}", node.tag, detail),
        None => node.tag.clone(),
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
