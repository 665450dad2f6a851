//! Conversion action registry
//!
//! Tracks which conversion actions are known to the ads platform so the
//! "create action" step runs at most once per name.

use std::collections::BTreeSet;

/// Set of conversion action names known for this run
///
/// Starts empty. The uploader calls [`ensure`](Self::ensure) once before any
/// delivery attempt and only reads the registry afterwards.
#[derive(Debug, Clone, Default)]
pub struct ConversionActionRegistry {
    actions: BTreeSet<String>,
}

impl ConversionActionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `name` is registered, creating it when missing
    ///
    /// Returns `true` when the action was created by this call.
    pub fn ensure(&mut self, name: &str) -> bool {
        if self.actions.contains(name) {
            tracing::info!(action = %name, "Conversion action already exists");
            return false;
        }

        tracing::info!(action = %name, "Conversion action not found, creating it");
        self.actions.insert(name.to_string());
        true
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains(name)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action has been registered yet
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_starts_empty() {
        let registry = ConversionActionRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("offline_purchase"));
    }

    #[test]
    fn test_ensure_creates_once() {
        let mut registry = ConversionActionRegistry::new();

        assert!(registry.ensure("offline_purchase"));
        assert!(!registry.ensure("offline_purchase"));
        assert!(registry.contains("offline_purchase"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ensure_distinct_names() {
        let mut registry = ConversionActionRegistry::new();
        registry.ensure("offline_purchase");
        registry.ensure("offline_lead");
        assert_eq!(registry.len(), 2);
    }
}
