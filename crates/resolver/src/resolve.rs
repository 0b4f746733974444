use crate::decision::Resolution;
use crate::error::{ResolveError, Result};
use log::debug;
use rescope_manifest::{names, ManifestGraph, NodeRef};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Drop a `#`-selector suffix. A leading `#` is opaque, not a selector.
pub fn strip_selector(id: &str) -> &str {
    match id.find('#') {
        Some(pos) if pos > 0 => &id[..pos],
        _ => id,
    }
}

/// Reverse-dependency walker: expands an id into the transitive set of
/// affected projects and eligible modules by climbing `require` edges.
///
/// Owns the per-run memoization cache and the in-progress set guarding
/// against `require` cycles. One resolver instance per engine run; results
/// must not leak across runs.
pub struct Resolver<'a> {
    graph: &'a ManifestGraph,
    module_kinds: &'a BTreeSet<String>,

    /// stripped id -> completed expansion (never includes the entry-level
    /// self-inclusion)
    cache: HashMap<String, Resolution>,

    /// ids whose expansion is on the current call stack
    in_progress: HashSet<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a ManifestGraph, module_kinds: &'a BTreeSet<String>) -> Self {
        Self {
            graph,
            module_kinds,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Entry point: expand `id` with level-0 self-inclusion.
    pub fn resolve(&mut self, id: &str) -> Result<Resolution> {
        self.expand(id, 0)
    }

    fn expand(&mut self, id: &str, depth: usize) -> Result<Resolution> {
        let mut result = Resolution::default();

        // The changed file's own target is itself affected. Checked on the
        // unstripped id: a selector suffix still names its module.
        if depth == 0 {
            if let Some(node) = self.graph.lookup_id(id) {
                match self.graph.tag(node) {
                    names::MODULE => {
                        if self.is_reportable_module(node) {
                            result.modules.insert(id.to_owned());
                        }
                    }
                    names::PROJECT => {
                        result.projects.insert(id.to_owned());
                    }
                    _ => {}
                }
            }
        }

        let key = strip_selector(id);
        for require in self.graph.find_nodes(names::REQUIRE, names::IDREF, key) {
            let rel = self
                .graph
                .nearest_with_attr(require, names::ID)
                .ok_or_else(|| ResolveError::NoOwningId(format!("require {}", key)))?;
            let rid = self
                .graph
                .attr(rel, names::ID)
                .map(str::to_owned)
                .ok_or_else(|| ResolveError::NoOwningId(format!("require {}", key)))?;

            if self.graph.tag(rel) == names::PROJECT {
                result.projects.insert(rid);
                continue;
            }

            if self.graph.tag(rel) == names::MODULE && self.is_reportable_module(rel) {
                result.modules.insert(rid.clone());
            }

            // An intermediate node, reportable or not, may itself be
            // required by something else.
            let rkey = strip_selector(&rid).to_owned();
            if let Some(cached) = self.cache.get(&rkey) {
                let cached = cached.clone();
                result.merge(&cached);
            } else if self.in_progress.contains(&rkey) {
                // require cycle: this id's dependents are already being
                // counted further up the stack
                debug!("require cycle at '{}', already counted", rkey);
            } else {
                self.in_progress.insert(rkey.clone());
                let sub = self.expand(&rkey, depth + 1)?;
                self.in_progress.remove(&rkey);
                result.merge(&sub);
                self.cache.insert(rkey, sub);
            }
        }

        Ok(result)
    }

    fn is_reportable_module(&self, node: NodeRef) -> bool {
        self.graph
            .attr(node, names::TYPE)
            .is_some_and(|kind| self.module_kinds.contains(kind))
    }
}
