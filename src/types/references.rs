use std::collections::BTreeSet;

use crate::types::TypeName;

/// External references an artifact needs: type imports and static imports.
/// Sets are ordered so that output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    imports: BTreeSet<String>,
    static_imports: BTreeSet<String>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_import(&mut self, import: impl Into<String>) {
        self.imports.insert(import.into());
    }

    /// Adds the import for a type, if it needs one.
    pub fn add_type(&mut self, type_name: &TypeName) {
        if let Some(import) = type_name.import() {
            self.imports.insert(import);
        }
    }

    pub fn add_static_import(&mut self, import: impl Into<String>) {
        self.static_imports.insert(import.into());
    }

    pub fn merge(&mut self, other: &References) {
        self.imports.extend(other.imports.iter().cloned());
        self.static_imports
            .extend(other.static_imports.iter().cloned());
    }

    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    pub fn static_imports(&self) -> &BTreeSet<String> {
        &self.static_imports
    }

    pub fn has_import(&self, import: &str) -> bool {
        self.imports.contains(import)
    }

    pub fn has_static_import(&self, import: &str) -> bool {
        self.static_imports.contains(import)
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.static_imports.is_empty()
    }
}
