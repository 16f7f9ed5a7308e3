use std::collections::HashMap;

use crate::gfx::scene::NodeId;

/// Loaded bone models by label.
///
/// Several assets can share a label. All of them stay registered in load
/// order, and [`ModelRegistry::get`] resolves to the most recent one.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Vec<NodeId>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, label: impl Into<String>, root: NodeId) {
        let label = label.into();
        let instances = self.models.entry(label.clone()).or_default();
        if !instances.is_empty() {
            log::debug!("'{label}' now has {} instances", instances.len() + 1);
        }
        instances.push(root);
    }

    /// Most recently registered root for `label`.
    pub fn get(&self, label: &str) -> Option<NodeId> {
        self.models.get(label).and_then(|ids| ids.last().copied())
    }

    pub fn instances(&self, label: &str) -> &[NodeId] {
        self.models.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.models.contains_key(label)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins() {
        let mut registry = ModelRegistry::new();
        registry.register("Femur", NodeId(3));
        registry.register("Femur", NodeId(7));
        registry.register("Skull", NodeId(9));

        assert_eq!(registry.get("Femur"), Some(NodeId(7)));
        assert_eq!(registry.instances("Femur"), &[NodeId(3), NodeId(7)]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_label() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.get("Tibia"), None);
        assert!(registry.instances("Tibia").is_empty());
        assert!(!registry.contains("Tibia"));
    }
}
