use crate::error::{ResolveError, Result};
use crate::resolve::strip_selector;
use log::debug;
use rescope_manifest::{names, ManifestGraph, NodeRef};
use std::collections::BTreeSet;

/// Removes candidate projects whose target hardware the originating module
/// does not declare support for.
///
/// Pure filter: never adds projects. A project whose hardware data is
/// incomplete (no MCU declared, or an MCU the device map does not know) is
/// retained, since incompatibility cannot be proven.
pub struct DeviceFilter<'a> {
    graph: &'a ManifestGraph,
}

impl<'a> DeviceFilter<'a> {
    pub fn new(graph: &'a ManifestGraph) -> Self {
        Self { graph }
    }

    pub fn retain_supported(
        &self,
        origin_id: &str,
        projects: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>> {
        let origin = self.lookup(origin_id)?;

        // Evaluated only against the module's own declaration, not its
        // dependents'.
        let expression = self.support_values(origin);
        if expression.is_empty() {
            return Ok(projects.clone());
        }

        let mut retained = BTreeSet::new();
        for project_id in projects {
            let project = self.lookup(project_id)?;
            if self.supports(&expression, project) {
                retained.insert(project_id.clone());
            } else {
                debug!(
                    "dropping '{}': hardware not supported by '{}'",
                    project_id, origin_id
                );
            }
        }
        Ok(retained)
    }

    fn lookup(&self, id: &str) -> Result<NodeRef> {
        self.graph
            .lookup_id(id)
            .or_else(|| self.graph.lookup_id(strip_selector(id)))
            .ok_or_else(|| ResolveError::UnknownId(id.to_owned()))
    }

    /// `value`s of the node's direct `device-support` children.
    fn support_values(&self, node: NodeRef) -> Vec<String> {
        self.graph
            .children(node)
            .into_iter()
            .filter(|&n| self.graph.tag(n) == names::DEVICE_SUPPORT)
            .filter_map(|n| self.graph.attr(n, names::VALUE))
            .map(str::to_owned)
            .collect()
    }

    fn supports(&self, expression: &[String], project: NodeRef) -> bool {
        let mcu = match self.support_values(project).into_iter().next() {
            Some(mcu) => mcu,
            // no declared MCU: incompatibility cannot be proven
            None => return true,
        };
        let groups = match self.graph.device_groups(&mcu) {
            Some(groups) => groups,
            // MCU unknown to the device map: same policy
            None => return true,
        };

        let mut membership: BTreeSet<&str> = groups.iter().map(String::as_str).collect();
        membership.insert(&mcu);

        expression.iter().all(|entry| membership.contains(entry.as_str()))
    }
}
