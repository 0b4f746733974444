use crate::config::EngineConfig;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// What a change-list entry turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Matches the always-rebuild list; short-circuits the run to `All`.
    Trigger,

    /// Resolves to an existing directory; contributes nothing.
    Directory,

    /// A (non-top-level) manifest file; routed to the origin finder.
    Manifest,

    /// Anything else; routed to the owner finder.
    Ordinary,
}

/// Classifies change-list entries against the run configuration.
pub struct Classifier {
    root: PathBuf,
    manifest_name: String,
    triggers: Vec<PathBuf>,
}

impl Classifier {
    pub fn new(config: &EngineConfig) -> Self {
        // Root-join the always-rebuild entries once, the same way change
        // entries are normalized, so trigger matching is path equality.
        let triggers = config
            .always_rebuild
            .iter()
            .map(|p| normalize_lexical(&config.root.join(p)))
            .collect();
        Self {
            root: config.root.clone(),
            manifest_name: config.manifest_name.clone(),
            triggers,
        }
    }

    /// Normalize a raw change-list entry relative to the root.
    pub fn normalize(&self, raw: &str) -> PathBuf {
        normalize_lexical(&self.root.join(raw.trim()))
    }

    /// Classify a normalized path. Pure apart from the directory probe.
    pub fn classify(&self, path: &Path) -> ChangeKind {
        if self.triggers.iter().any(|t| t == path) {
            ChangeKind::Trigger
        } else if path.is_dir() {
            ChangeKind::Directory
        } else if path.file_name() == Some(OsStr::new(&self.manifest_name)) {
            ChangeKind::Manifest
        } else {
            ChangeKind::Ordinary
        }
    }
}

/// Resolve `.` and `..` components lexically, without touching the
/// filesystem. Matches how build-item paths were recorded in the manifest.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let poppable = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if poppable {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
