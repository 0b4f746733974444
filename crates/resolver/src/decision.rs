use serde::Serialize;
use std::collections::BTreeSet;

/// Result of expanding one id through the reverse `require` walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub projects: BTreeSet<String>,
    pub modules: BTreeSet<String>,
}

impl Resolution {
    pub fn merge(&mut self, other: &Resolution) {
        self.projects.extend(other.projects.iter().cloned());
        self.modules.extend(other.modules.iter().cloned());
    }
}

/// Tri-state output of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RebuildDecision {
    /// Build nothing; produced only on the fatal input path.
    Nothing,

    /// Rebuild everything.
    All,

    /// Rebuild exactly these projects, retest exactly these modules.
    Subset {
        projects: BTreeSet<String>,
        modules: BTreeSet<String>,
    },
}

/// Machine-readable run summary for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub decision: &'static str,
    pub projects: usize,
    pub modules: usize,
    pub projects_out: String,
    pub modules_out: String,
}

impl RunSummary {
    pub fn new(
        decision: &RebuildDecision,
        projects_out: impl Into<String>,
        modules_out: impl Into<String>,
    ) -> Self {
        let (kind, projects, modules) = match decision {
            RebuildDecision::Nothing => ("nothing", 0, 0),
            RebuildDecision::All => ("all", 0, 0),
            RebuildDecision::Subset { projects, modules } => {
                ("subset", projects.len(), modules.len())
            }
        };
        Self {
            decision: kind,
            projects,
            modules,
            projects_out: projects_out.into(),
            modules_out: modules_out.into(),
        }
    }
}
