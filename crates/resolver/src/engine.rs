use crate::classify::{ChangeKind, Classifier};
use crate::config::EngineConfig;
use crate::decision::RebuildDecision;
use crate::device::DeviceFilter;
use crate::error::Result;
use crate::owners::OwnerFinder;
use crate::resolve::Resolver;
use itertools::Itertools;
use log::{debug, info};
use rescope_manifest::{names, ManifestGraph};
use std::collections::BTreeSet;

/// Sequences one resolution run: classify every changed path, collect the
/// owning ids, expand them through the reverse-dependency walk, and reduce
/// to a rebuild decision.
pub struct Engine<'a> {
    graph: &'a ManifestGraph,
    config: EngineConfig,
}

impl<'a> Engine<'a> {
    pub fn new(graph: &'a ManifestGraph, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    /// Run over the raw change-list lines. Blank lines are ignored.
    pub fn run<I>(&self, changes: I) -> Result<RebuildDecision>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let classifier = Classifier::new(&self.config);
        let owners = OwnerFinder::new(self.graph);

        info!("finding owners for changed files");
        let mut affected: BTreeSet<String> = BTreeSet::new();
        for raw in changes {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let path = classifier.normalize(raw);

            match classifier.classify(&path) {
                ChangeKind::Trigger => {
                    debug!(
                        "'{}' is in the always-rebuild list, rebuilding everything",
                        path.display()
                    );
                    return Ok(RebuildDecision::All);
                }
                ChangeKind::Directory => {
                    debug!("skipping directory '{}'", path.display());
                }
                ChangeKind::Manifest => match owners.for_manifest(&path) {
                    Some(ids) => affected.extend(ids),
                    None => {
                        debug!(
                            "no ids originate from manifest '{}', rebuilding everything",
                            path.display()
                        );
                        return Ok(RebuildDecision::All);
                    }
                },
                ChangeKind::Ordinary => {
                    let found = match owners.for_file(&path)? {
                        Some(ids) => Some(ids),
                        None => owners.for_file_extended(&path)?,
                    };
                    match found {
                        Some(ids) => affected.extend(ids),
                        None => {
                            debug!(
                                "no owner for '{}', rebuilding everything",
                                path.display()
                            );
                            return Ok(RebuildDecision::All);
                        }
                    }
                }
            }
        }
        debug!("affected ids: {}", affected.iter().join(", "));

        info!("finding projects for {} affected ids", affected.len());
        let mut resolver = Resolver::new(self.graph, &self.config.module_kinds);
        let device = DeviceFilter::new(self.graph);
        let mut projects: BTreeSet<String> = BTreeSet::new();
        let mut modules: BTreeSet<String> = BTreeSet::new();

        for id in &affected {
            let resolution = resolver.resolve(id)?;
            let resolved_projects = if self.config.check_device_support {
                device.retain_supported(id, &resolution.projects)?
            } else {
                resolution.projects
            };
            projects.extend(resolved_projects);
            modules.extend(resolution.modules);
        }

        let everything = self.graph.ids_of_tag(names::PROJECT);
        if self.config.show_not_affected {
            for id in everything.difference(&projects) {
                debug!("not affected: {}", id);
            }
        }

        if projects.is_empty() {
            // Known to the manifest but tied to no project: a shared
            // artifact such as a linker script. Rebuild everything.
            info!("no project-level consequence found, rebuilding everything");
            return Ok(RebuildDecision::All);
        }
        if projects == everything {
            info!("all {} projects affected, rebuilding everything", everything.len());
            return Ok(RebuildDecision::All);
        }

        info!(
            "{} projects need rebuild, {} not affected, {} modules affected",
            projects.len(),
            everything.len() - projects.len(),
            modules.len()
        );
        Ok(RebuildDecision::Subset { projects, modules })
    }
}
