use cgmath::Vector3;

use crate::{
    config::{IsolationSettings, ViewerConfig, ViewportLayout},
    gfx::{
        picking::pick_at_pointer,
        scene::{NodeId, Scene},
    },
};

use super::{highlight, isolation, state::ViewerState};

/// Largest pointer travel, in pixels, between press and release that still
/// counts as a click rather than a drag.
pub const CLICK_SLOP: f32 = 4.0;

/// Tells clicks apart from orbit drags.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClickGesture {
    pressed_at: Option<(f32, f32)>,
}

impl ClickGesture {
    pub fn press(&mut self, position: (f32, f32)) {
        self.pressed_at = Some(position);
    }

    /// True when the release completes a click.
    pub fn release(&mut self, position: (f32, f32)) -> bool {
        let Some((x, y)) = self.pressed_at.take() else {
            return false;
        };
        let (dx, dy) = (position.0 - x, position.1 - y);
        dx * dx + dy * dy <= CLICK_SLOP * CLICK_SLOP
    }

    pub fn cancel(&mut self) {
        self.pressed_at = None;
    }
}

/// Routes pointer and button input to hover, isolation and restoration.
///
/// Owns the [`ViewerState`]; the scene is passed in per call so the renderer
/// can hold it in between.
pub struct ViewerController {
    state: ViewerState,
    layout: ViewportLayout,
    isolation: IsolationSettings,
    home: (Vector3<f32>, Vector3<f32>),
}

impl ViewerController {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            state: ViewerState::new(),
            layout: config.layout,
            isolation: config.isolation.clone(),
            home: config.camera.home(),
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn layout(&self) -> &ViewportLayout {
        &self.layout
    }

    /// Nearest visible mesh under `pointer` for a window of `window_size`.
    fn pick(&self, scene: &Scene, pointer: (f32, f32), window_size: (f32, f32)) -> Option<NodeId> {
        let canvas = self.layout.canvas_rect(window_size.0, window_size.1);
        pick_at_pointer(pointer, canvas, scene)
            .first()
            .map(|hit| hit.node)
    }

    pub fn pointer_moved(
        &mut self,
        scene: &mut Scene,
        pointer: (f32, f32),
        window_size: (f32, f32),
    ) {
        let hit = self.pick(scene, pointer, window_size);
        highlight::update_hover(&mut self.state, scene, hit, pointer, self.isolation.cue());
    }

    /// The pointer left the window or moved over a UI window.
    pub fn pointer_left(&mut self, scene: &mut Scene) {
        highlight::clear_hover(&mut self.state, scene);
    }

    /// Isolates the nearest visible mesh under `pointer`, if any. Returns
    /// whether the isolation changed.
    pub fn click(
        &mut self,
        scene: &mut Scene,
        pointer: (f32, f32),
        window_size: (f32, f32),
    ) -> bool {
        match self.pick(scene, pointer, window_size) {
            Some(node) => isolation::isolate(&mut self.state, scene, node, &self.isolation),
            None => false,
        }
    }

    /// Back to the full model. Returns `false` if nothing was isolated.
    pub fn return_to_assembly(&mut self, scene: &mut Scene) -> bool {
        isolation::restore(&mut self.state, scene, self.home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        anatomy::{descriptors, registry::ModelRegistry},
        gfx::scene::{testing::{cube_node, test_scene}, BoneTag},
        viewer::{highlight::is_emphasized, state::InfoPanel},
    };
    use cgmath::InnerSpace;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const WINDOW: (f32, f32) = (100.0, 100.0);
    const CENTER: (f32, f32) = (50.0, 50.0);
    const EMPTY: (f32, f32) = (50.0, 5.0);
    /// Over the Femur at x = 1.5 with the camera at (0, 0, 5)
    const FEMUR: (f32, f32) = (86.0, 50.0);
    /// Over the second skull piece at x = -1.5
    const SKULL_SIDE: (f32, f32) = (14.0, 50.0);

    /// Canvas fills the whole 100x100 window so pixels map straight to NDC.
    fn controller() -> ViewerController {
        let mut config = ViewerConfig::default();
        config.layout = ViewportLayout {
            canvas_fraction: 1.0,
            header_height: 0.0,
        };
        ViewerController::new(&config)
    }

    fn add_bone(
        scene: &mut Scene,
        registry: &mut ModelRegistry,
        label: &str,
        pieces: &[Vector3<f32>],
    ) -> Vec<NodeId> {
        let group = scene.create_group(label);
        let meshes: Vec<NodeId> = pieces
            .iter()
            .map(|&center| {
                let id = cube_node(scene, label, center, 0.5);
                scene.node_mut(id).unwrap().bone = Some(BoneTag {
                    label: label.to_string(),
                    description: descriptors::describe(label).to_string(),
                });
                scene.attach(id, group);
                id
            })
            .collect();
        scene.add_to_root(group);
        registry.register(label, group);
        meshes
    }

    /// Skull in the middle (with a side piece), two femurs on the right.
    fn skeleton() -> (Scene, ModelRegistry, Vec<NodeId>, Vec<NodeId>) {
        let mut scene = test_scene();
        let mut registry = ModelRegistry::new();
        let skull = add_bone(
            &mut scene,
            &mut registry,
            "Skull",
            &[Vector3::new(0.0, 0.0, 0.0), Vector3::new(-1.5, 0.0, 0.0)],
        );
        let mut femurs = add_bone(
            &mut scene,
            &mut registry,
            "Femur",
            &[Vector3::new(1.5, 0.0, 0.0)],
        );
        femurs.extend(add_bone(
            &mut scene,
            &mut registry,
            "Femur",
            &[Vector3::new(1.5, 0.0, -3.0)],
        ));
        (scene, registry, skull, femurs)
    }

    fn emphasized(scene: &Scene) -> Vec<NodeId> {
        scene
            .visible_meshes()
            .iter()
            .filter(|m| m.material.is_emphasized())
            .map(|m| m.id)
            .collect()
    }

    #[test]
    fn test_click_gesture() {
        let mut gesture = ClickGesture::default();
        assert!(!gesture.release((0.0, 0.0)));

        gesture.press((10.0, 10.0));
        assert!(gesture.release((13.0, 12.0)));

        gesture.press((10.0, 10.0));
        assert!(!gesture.release((20.0, 10.0)));

        gesture.press((10.0, 10.0));
        gesture.cancel();
        assert!(!gesture.release((10.0, 10.0)));
    }

    #[test]
    fn test_duplicate_femurs_resolve_to_second() {
        let (scene, registry, _, femurs) = skeleton();
        let instances = registry.instances("Femur");
        assert_eq!(instances.len(), 2);
        assert_eq!(registry.get("Femur"), Some(instances[1]));
        assert_eq!(scene.parent(femurs[1]), Some(instances[1]));
        assert_eq!(scene.visible_meshes().len(), 4);
    }

    #[test]
    fn test_click_skull_shows_panel_and_frames_it() {
        let (mut scene, _, skull, _) = skeleton();
        let mut viewer = controller();

        assert!(viewer.click(&mut scene, CENTER, WINDOW));

        let state = viewer.state();
        assert_eq!(state.isolated(), Some(skull[0]));
        assert!(state.return_visible);
        assert_eq!(state.info_panel.heading(), Some("Skull"));
        assert_eq!(state.info_panel.body(), descriptors::describe("Skull"));

        let target = scene.camera_manager.camera.target;
        let center = scene.bounding_box(skull[0]).unwrap().center();
        assert!((target - center).magnitude() < 1e-4);
    }

    #[test]
    fn test_click_then_return_restores_everything() {
        let (mut scene, _, skull, _) = skeleton();
        let mut viewer = controller();
        let top_level = scene.top_level().to_vec();

        viewer.click(&mut scene, CENTER, WINDOW);
        assert!(viewer.return_to_assembly(&mut scene));

        let state = viewer.state();
        assert_eq!(state.info_panel, InfoPanel::Placeholder);
        assert_eq!(state.info_panel.body(), descriptors::PLACEHOLDER);
        assert!(!state.return_visible);
        assert!(!state.tooltip.visible);

        let camera = &scene.camera_manager.camera;
        assert!((camera.eye - Vector3::new(0.0, 5.0, 5.0)).magnitude() < 1e-4);
        assert!(camera.target.magnitude() < 1e-6);

        assert_eq!(scene.top_level(), top_level.as_slice());
        assert!(top_level.iter().all(|&id| scene.is_visible(id)));
        assert_eq!(scene.children(top_level[0]), skull.as_slice());
        assert!(emphasized(&scene).is_empty());

        assert!(!viewer.return_to_assembly(&mut scene));
    }

    #[test]
    fn test_moves_over_nothing_keep_tooltip_hidden() {
        let (mut scene, ..) = skeleton();
        let mut viewer = controller();
        for pointer in [EMPTY, (5.0, 5.0), (95.0, 95.0), (-20.0, 50.0), (50.0, 400.0)] {
            viewer.pointer_moved(&mut scene, pointer, WINDOW);
            assert!(!viewer.state().tooltip.visible);
            assert!(emphasized(&scene).is_empty());
        }
    }

    #[test]
    fn test_hover_x_then_y_then_nothing() {
        let (mut scene, _, skull, femurs) = skeleton();
        let mut viewer = controller();

        viewer.pointer_moved(&mut scene, CENTER, WINDOW);
        assert_eq!(emphasized(&scene), vec![skull[0]]);
        assert_eq!(viewer.state().tooltip.label, "Skull");
        assert_eq!(viewer.state().tooltip.position, (60.0, 60.0));

        viewer.pointer_moved(&mut scene, FEMUR, WINDOW);
        assert_eq!(emphasized(&scene), vec![femurs[0]]);
        assert_eq!(viewer.state().tooltip.label, "Femur");

        viewer.pointer_moved(&mut scene, EMPTY, WINDOW);
        assert!(emphasized(&scene).is_empty());
        assert!(!viewer.state().tooltip.visible);
    }

    #[test]
    fn test_pointer_leaving_clears_hover() {
        let (mut scene, ..) = skeleton();
        let mut viewer = controller();
        viewer.pointer_moved(&mut scene, CENTER, WINDOW);
        viewer.pointer_left(&mut scene);
        assert!(emphasized(&scene).is_empty());
        assert!(!viewer.state().tooltip.visible);
    }

    #[test]
    fn test_isolated_emphasis_survives_other_hovers() {
        let (mut scene, _, skull, _) = skeleton();
        let mut viewer = controller();

        viewer.pointer_moved(&mut scene, CENTER, WINDOW);
        viewer.click(&mut scene, CENTER, WINDOW);
        assert_eq!(viewer.state().hover, None);
        // Put the camera back where the pointer constants were measured.
        scene
            .camera_manager
            .look_from(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 0.0));

        viewer.pointer_moved(&mut scene, SKULL_SIDE, WINDOW);
        assert!(is_emphasized(&scene, skull[1]));
        assert!(is_emphasized(&scene, skull[0]));

        viewer.pointer_moved(&mut scene, EMPTY, WINDOW);
        assert!(!is_emphasized(&scene, skull[1]));
        assert!(is_emphasized(&scene, skull[0]));

        viewer.pointer_moved(&mut scene, CENTER, WINDOW);
        viewer.pointer_moved(&mut scene, EMPTY, WINDOW);
        assert!(!is_emphasized(&scene, skull[0]));
        assert!(viewer.state().is_isolated());
    }

    #[test]
    fn test_hidden_bones_cannot_be_hovered_while_isolated() {
        let (mut scene, _, _, femurs) = skeleton();
        let mut viewer = controller();
        viewer.click(&mut scene, CENTER, WINDOW);
        scene
            .camera_manager
            .look_from(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 0.0));

        viewer.pointer_moved(&mut scene, FEMUR, WINDOW);
        assert!(!is_emphasized(&scene, femurs[0]));
        assert!(!viewer.state().tooltip.visible);
    }

    #[test]
    fn test_single_isolation_over_random_clicks() {
        let (mut scene, ..) = skeleton();
        let mut viewer = controller();
        let root = scene.root();
        let layout: Vec<(NodeId, Vec<NodeId>)> = scene
            .top_level()
            .iter()
            .map(|&group| (group, scene.children(group).to_vec()))
            .collect();

        let mut rng = StdRng::seed_from_u64(0xFE115);
        for _ in 0..300 {
            if rng.random_bool(0.15) {
                viewer.return_to_assembly(&mut scene);
            } else {
                let pointer = (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0));
                viewer.click(&mut scene, pointer, WINDOW);
            }

            let lifted: Vec<NodeId> = scene
                .top_level()
                .iter()
                .copied()
                .filter(|&id| scene.node(id).is_some_and(|n| n.is_mesh()))
                .collect();
            assert!(lifted.len() <= 1);
            assert_eq!(lifted.first().copied(), viewer.state().isolated());
            if let Some(node) = viewer.state().isolated() {
                assert_eq!(scene.parent(node), Some(root));
                assert_eq!(emphasized(&scene), vec![node]);
            }
        }

        viewer.return_to_assembly(&mut scene);
        for (group, children) in layout {
            assert_eq!(scene.children(group), children.as_slice());
            assert!(scene.is_visible(group));
        }
    }
}
