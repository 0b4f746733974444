use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MCU name -> hardware group names the MCU belongs to.
///
/// Group order follows the catalog's declaration order; membership checks in
/// the device-support filter treat the list as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMap {
    groups: BTreeMap<String, Vec<String>>,
}

impl DeviceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mcu: impl Into<String>, groups: Vec<String>) {
        self.groups.insert(mcu.into(), groups);
    }

    /// Hardware groups for an MCU, or `None` for an MCU the catalog does not
    /// know about.
    pub fn groups_for(&self, mcu: &str) -> Option<&[String]> {
        self.groups.get(mcu).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }
}
