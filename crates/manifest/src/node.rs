use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag and attribute names with a fixed meaning in the catalog vocabulary.
///
/// Any tag or attribute outside this list is carried opaquely; the resolver
/// only ever dispatches on these.
pub mod names {
    pub const PROJECT: &str = "project";
    pub const MODULE: &str = "module";
    pub const REQUIRE: &str = "require";
    pub const BUILD: &str = "build";
    pub const DEVICE_SUPPORT: &str = "device-support";

    pub const ID: &str = "id";
    pub const IDREF: &str = "idref";
    pub const TYPE: &str = "type";
    pub const SUBTYPE: &str = "subtype";
    pub const VALUE: &str = "value";
    pub const ORIGIN_FILE: &str = "origin-file";

    pub const MODULE_CONFIG: &str = "module-config";
    pub const DISTRIBUTE: &str = "distribute";
    pub const PATH: &str = "path";
    pub const REQUIRED_HEADER_FILE: &str = "required-header-file";
}

/// One entry in the manifest graph: a tag plus its attribute map.
///
/// Parent/child structure lives in [`crate::ManifestGraph`], not here. Nodes
/// are never mutated after the graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node kind (`project`, `module`, `require`, `build`, ...)
    pub tag: String,

    /// Attribute map; `id`, `type`, `subtype`, `value`, `idref` and
    /// `origin-file` are ordinary entries here.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl ManifestNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter, used by tests and tooling.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr(names::ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attrs_round_trip_through_builder_style() {
        let node = ManifestNode::new("module")
            .with_attr("id", "drivers.uart")
            .with_attr("type", "driver");

        assert_eq!(node.tag, "module");
        assert_eq!(node.id(), Some("drivers.uart"));
        assert_eq!(node.attr(names::TYPE), Some("driver"));
        assert_eq!(node.attr("subtype"), None);
    }
}
