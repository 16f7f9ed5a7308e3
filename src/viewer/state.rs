use crate::{
    anatomy::descriptors,
    gfx::scene::{NodeId, Transform},
};

/// Where an isolated node came from, so it can be put back exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationRecord {
    pub node: NodeId,
    /// Local transform before isolation
    pub transform: Transform,
    pub parent: NodeId,
    /// Position among the parent's children
    pub sibling_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub label: String,
    /// Window pixels
    pub position: (f32, f32),
}

impl Tooltip {
    pub fn show(&mut self, label: &str, position: (f32, f32)) {
        self.visible = true;
        if self.label != label {
            self.label = label.to_string();
        }
        self.position = position;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Content of the side panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InfoPanel {
    #[default]
    Placeholder,
    Bone { label: String, description: String },
}

impl InfoPanel {
    pub fn heading(&self) -> Option<&str> {
        match self {
            InfoPanel::Placeholder => None,
            InfoPanel::Bone { label, .. } => Some(label),
        }
    }

    pub fn body(&self) -> &str {
        match self {
            InfoPanel::Placeholder => descriptors::PLACEHOLDER,
            InfoPanel::Bone { description, .. } => descriptors::panel_text(description),
        }
    }
}

/// Everything the viewer remembers between events.
///
/// `hover` is the node whose emphasis belongs to the pointer. The isolated
/// node's emphasis belongs to `isolation` and is tracked separately, so the
/// two only meet when the pointer passes over the isolated node.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub hover: Option<NodeId>,
    pub isolation: Option<IsolationRecord>,
    pub tooltip: Tooltip,
    pub info_panel: InfoPanel,
    pub return_visible: bool,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolated(&self) -> Option<NodeId> {
        self.isolation.as_ref().map(|record| record.node)
    }

    pub fn is_isolated(&self) -> bool {
        self.isolation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_text() {
        let panel = InfoPanel::default();
        assert_eq!(panel.heading(), None);
        assert_eq!(panel.body(), "Click on a bone to learn more about it!");

        let panel = InfoPanel::Bone {
            label: "Molar".into(),
            description: String::new(),
        };
        assert_eq!(panel.heading(), Some("Molar"));
        assert_eq!(panel.body(), "No description provided.");
    }
}
