//! Hover emphasis and tooltip.
//!
//! One hover slot. Emphasis moves with the nearest hit: the old node is always
//! cleared before the new one is lit.

use crate::gfx::{
    resources::material::EmphasisCue,
    scene::{NodeId, Scene},
};

use super::state::ViewerState;

/// Tooltip offset from the pointer, both axes
pub const TOOLTIP_OFFSET: f32 = 10.0;

pub fn emphasize(scene: &mut Scene, id: NodeId, cue: EmphasisCue) {
    if let Some(material) = scene.node_mut(id).and_then(|node| node.material_mut()) {
        material.emphasize(cue);
    }
}

pub fn clear_emphasis(scene: &mut Scene, id: NodeId) {
    if let Some(material) = scene.node_mut(id).and_then(|node| node.material_mut()) {
        material.clear_emphasis();
    }
}

pub fn is_emphasized(scene: &Scene, id: NodeId) -> bool {
    scene
        .node(id)
        .and_then(|node| node.mesh())
        .is_some_and(|mesh| mesh.material.is_emphasized())
}

/// Applies the nearest hit (or none) at `pointer` to the hover slot and tooltip.
pub fn update_hover(
    state: &mut ViewerState,
    scene: &mut Scene,
    hit: Option<NodeId>,
    pointer: (f32, f32),
    cue: EmphasisCue,
) {
    let Some(node) = hit else {
        clear_hover(state, scene);
        return;
    };

    if state.hover != Some(node) {
        if let Some(previous) = state.hover.take() {
            clear_emphasis(scene, previous);
        }
        emphasize(scene, node, cue);
        state.hover = Some(node);
        log::debug!("Hovering {node:?}");
    }

    let label = scene.node(node).map(|n| n.display_label()).unwrap_or_default();
    state.tooltip.show(
        label,
        (pointer.0 + TOOLTIP_OFFSET, pointer.1 + TOOLTIP_OFFSET),
    );
}

/// Empties the hover slot, clearing its emphasis, and hides the tooltip.
pub fn clear_hover(state: &mut ViewerState, scene: &mut Scene) {
    if let Some(previous) = state.hover.take() {
        clear_emphasis(scene, previous);
    }
    state.tooltip.hide();
}
