//! file: core/src/lower/scope.rs
//! description: first-use declaration tracking.
//!
//! Names are tracked for the whole file, not per block: a name first
//! assigned inside one branch counts as declared for the rest of the file.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct DeclarationTracker {
    declared: HashSet<String>,
}

impl DeclarationTracker {
    pub fn new() -> Self {
        DeclarationTracker::default()
    }

    /// Returns true the first time `name` is seen and records it.
    pub fn is_first_declaration(&mut self, name: &str) -> bool {
        if self.declared.contains(name) {
            return false;
        }
        self.declared.insert(name.to_string());
        true
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}
