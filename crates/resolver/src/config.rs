use std::collections::BTreeSet;
use std::path::PathBuf;

/// Module `type` values eligible for reporting.
pub const DEFAULT_MODULE_KINDS: &[&str] = &["driver", "service", "component", "library"];

/// Default manifest filename, top-level and per-module alike.
pub const DEFAULT_MANIFEST_NAME: &str = "asf.xml";

/// One engine run's configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root every change-list entry is normalized against; must match how
    /// the manifest's build-item paths were recorded.
    pub root: PathBuf,

    /// Manifest filename (basename match routes to the origin finder).
    pub manifest_name: String,

    /// Paths (relative to `root`) whose change forces a full rebuild.
    /// Default: the top-level manifest at the root.
    pub always_rebuild: Vec<PathBuf>,

    /// Module `type` values worth reporting; other kinds are traversed
    /// through but never emitted.
    pub module_kinds: BTreeSet<String>,

    /// Drop projects whose hardware the originating module does not support.
    pub check_device_support: bool,

    /// Debug-log every project the change did not touch.
    pub show_not_affected: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            manifest_name: DEFAULT_MANIFEST_NAME.to_owned(),
            always_rebuild: vec![PathBuf::from(DEFAULT_MANIFEST_NAME)],
            module_kinds: DEFAULT_MODULE_KINDS.iter().map(|s| (*s).to_owned()).collect(),
            check_device_support: false,
            show_not_affected: false,
        }
    }
}
