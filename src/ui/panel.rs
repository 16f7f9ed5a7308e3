// src/ui/panel.rs
//! Viewer panels: header band, bone information, tooltip, and the return
//! button.
//!
//! All positions are in window pixels and follow [`ViewportLayout`], so the
//! panels sit exactly around the 3D canvas.

use imgui::{Condition, WindowFlags};

use crate::{
    config::ViewportLayout,
    viewer::{InfoPanel, Tooltip, ViewerState},
};

pub const RETURN_LABEL: &str = "Return to Full Model";
/// Top-left corner of the return button window
pub const RETURN_POSITION: [f32; 2] = [20.0, 90.0];

/// What the user asked for through the UI this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiAction {
    #[default]
    None,
    ReturnToFullModel,
}

/// Position and size of the information panel: the window strip right of
/// the canvas, below the header.
pub fn info_panel_rect(layout: &ViewportLayout, display_size: [f32; 2]) -> ([f32; 2], [f32; 2]) {
    let canvas = layout.canvas_rect(display_size[0], display_size[1]);
    let left = canvas.left + canvas.width;
    (
        [left, canvas.top],
        [(display_size[0] - left).max(0.0), canvas.height],
    )
}

fn fixed_flags() -> WindowFlags {
    WindowFlags::NO_MOVE | WindowFlags::NO_RESIZE | WindowFlags::NO_COLLAPSE
}

/// Builds every viewer panel for this frame.
pub fn viewer_ui(
    ui: &imgui::Ui,
    state: &ViewerState,
    layout: &ViewportLayout,
    title: &str,
) -> UiAction {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return UiAction::None;
    }

    header(ui, layout, title, display_size);
    info_panel(ui, &state.info_panel, layout, display_size);
    tooltip(ui, &state.tooltip);

    if state.return_visible && return_button(ui) {
        UiAction::ReturnToFullModel
    } else {
        UiAction::None
    }
}

fn header(ui: &imgui::Ui, layout: &ViewportLayout, title: &str, display_size: [f32; 2]) {
    let height = layout.header_height.min(display_size[1]);
    if height <= 0.0 {
        return;
    }

    ui.window("##header")
        .position([0.0, 0.0], Condition::Always)
        .size([display_size[0], height], Condition::Always)
        .flags(fixed_flags() | WindowFlags::NO_TITLE_BAR | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS)
        .build(|| {
            ui.text(title);
            ui.text_disabled("Hover a bone to name it, click to isolate it. Drag to orbit.");
        });
}

fn info_panel(ui: &imgui::Ui, panel: &InfoPanel, layout: &ViewportLayout, display_size: [f32; 2]) {
    let (position, size) = info_panel_rect(layout, display_size);
    if size[0] <= 0.0 || size[1] <= 0.0 {
        return;
    }

    ui.window("Anatomy")
        .position(position, Condition::Always)
        .size(size, Condition::Always)
        .flags(fixed_flags())
        .build(|| {
            if let Some(heading) = panel.heading() {
                ui.text_colored([1.0, 0.85, 0.6, 1.0], heading);
                ui.separator();
            }
            ui.text_wrapped(panel.body());
        });
}

fn tooltip(ui: &imgui::Ui, tooltip: &Tooltip) {
    if !tooltip.visible {
        return;
    }

    let [x, y] = [tooltip.position.0, tooltip.position.1];
    ui.window("##tooltip")
        .position([x, y], Condition::Always)
        .flags(
            WindowFlags::NO_DECORATION
                | WindowFlags::NO_INPUTS
                | WindowFlags::NO_FOCUS_ON_APPEARING
                | WindowFlags::NO_SAVED_SETTINGS,
        )
        .always_auto_resize(true)
        .bg_alpha(0.8)
        .build(|| {
            ui.text(&tooltip.label);
        });
}

/// True on the frame the button is pressed.
fn return_button(ui: &imgui::Ui) -> bool {
    ui.window("##return")
        .position(RETURN_POSITION, Condition::Always)
        .flags(fixed_flags() | WindowFlags::NO_TITLE_BAR | WindowFlags::NO_BACKGROUND)
        .always_auto_resize(true)
        .build(|| ui.button(RETURN_LABEL))
        .unwrap_or(false)
}
