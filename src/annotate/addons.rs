use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One known add-on, keyed by its on-disk directory token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonInfo {
    pub dir: String,
    pub display_name: String,
    pub version: Option<String>,
    pub workshop_id: Option<String>,
}

/// Host-supplied lookup of known add-ons.
#[derive(Debug, Clone, Default)]
pub struct AddonRegistry {
    by_dir: HashMap<String, AddonInfo>,
}

impl AddonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: AddonInfo) {
        self.by_dir.insert(info.dir.clone(), info);
    }

    pub fn lookup(&self, dir: &str) -> Option<&AddonInfo> {
        self.by_dir.get(dir)
    }

    pub fn lookup_by_workshop_id(&self, id: &str) -> Option<&AddonInfo> {
        self.by_dir
            .values()
            .find(|info| info.workshop_id.as_deref() == Some(id))
    }

    /// Display name for a directory token, falling back to the raw token
    /// so unknown add-ons still get a readable label.
    pub fn display_name<'a>(&'a self, dir: &'a str) -> &'a str {
        match self.lookup(dir) {
            Some(info) if !info.display_name.is_empty() => info.display_name.as_str(),
            _ => dir,
        }
    }

    pub fn len(&self) -> usize {
        self.by_dir.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dir.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddonInfo> {
        self.by_dir.values()
    }
}

impl FromIterator<AddonInfo> for AddonRegistry {
    fn from_iter<T: IntoIterator<Item = AddonInfo>>(iter: T) -> Self {
        let mut registry = Self::new();
        for info in iter {
            registry.insert(info);
        }
        registry
    }
}
