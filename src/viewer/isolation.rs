//! Isolating one bone and putting it back.
//!
//! Isolation hides every other top-level model, lifts the bone to the scene
//! root, lights it and frames it with the camera. Restoration undoes exactly
//! that, using the [`IsolationRecord`] taken on the way in.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    anatomy::descriptors,
    config::IsolationSettings,
    gfx::scene::{NodeId, Scene, Transform},
};

use super::{
    highlight::{clear_emphasis, clear_hover, emphasize},
    state::{InfoPanel, IsolationRecord, ViewerState},
};

/// Isolates mesh node `node`. Any current isolation is undone first, without
/// moving the camera. Returns `false` if nothing changed: the node is already
/// isolated, is not a mesh, or is not attached.
pub fn isolate(
    state: &mut ViewerState,
    scene: &mut Scene,
    node: NodeId,
    settings: &IsolationSettings,
) -> bool {
    if state.isolated() == Some(node) {
        return false;
    }
    if !scene.node(node).is_some_and(|n| n.is_mesh()) || scene.parent(node).is_none() {
        log::warn!("Cannot isolate {node:?}: not an attached mesh");
        return false;
    }

    if let Some(hovered) = state.hover.take() {
        if hovered != node {
            clear_emphasis(scene, hovered);
        }
    }
    reattach(state, scene);

    let Some(record) = snapshot(scene, node) else {
        return false;
    };

    let root = scene.root();
    for child in scene.top_level().to_vec() {
        scene.set_visible(child, child == node || child == record.parent);
    }

    let world = scene.world_matrix(node);
    scene.attach(node, root);
    if settings.preserve_world_transform {
        let root_inverse = scene
            .world_matrix(root)
            .invert()
            .unwrap_or_else(Matrix4::identity);
        if let Some(n) = scene.node_mut(node) {
            n.transform = Transform::from_matrix(&(root_inverse * world));
        }
    }
    scene.set_visible(node, true);

    emphasize(scene, node, settings.cue());
    frame(scene, node, settings.framing_factor);

    let (label, description) = match scene.node(node) {
        Some(n) => match &n.bone {
            Some(tag) => (tag.label.clone(), tag.description.clone()),
            None => (n.name.clone(), descriptors::describe(&n.name).to_string()),
        },
        None => (String::new(), String::new()),
    };
    log::info!("Isolated {label}");

    state.isolation = Some(record);
    state.return_visible = true;
    state.info_panel = InfoPanel::Bone { label, description };
    true
}

/// Puts the isolated node back and resets the view: camera at `home`
/// (eye, target), emphasis and tooltip cleared, placeholder panel. Returns
/// `false` when nothing was isolated.
pub fn restore(
    state: &mut ViewerState,
    scene: &mut Scene,
    home: (Vector3<f32>, Vector3<f32>),
) -> bool {
    let Some(node) = reattach(state, scene) else {
        return false;
    };

    scene.camera_manager.look_from(home.0, home.1);
    clear_hover(state, scene);
    state.return_visible = false;
    state.info_panel = InfoPanel::Placeholder;
    log::info!("Restored {node:?} to the full model");
    true
}

fn snapshot(scene: &Scene, node: NodeId) -> Option<IsolationRecord> {
    let parent = scene.parent(node)?;
    let sibling_index = scene.children(parent).iter().position(|&c| c == node)?;
    Some(IsolationRecord {
        node,
        transform: scene.node(node)?.transform,
        parent,
        sibling_index,
    })
}

/// Undoes the scene side of the current isolation. The camera is left alone.
fn reattach(state: &mut ViewerState, scene: &mut Scene) -> Option<NodeId> {
    let record = state.isolation.take()?;
    if let Some(n) = scene.node_mut(record.node) {
        n.transform = record.transform;
    }
    scene.attach_at(record.node, record.parent, record.sibling_index);

    for child in scene.top_level().to_vec() {
        scene.set_visible(child, true);
    }
    clear_emphasis(scene, record.node);
    Some(record.node)
}

/// Camera at `center + (0, 0, diagonal * factor)` looking at `center`.
fn frame(scene: &mut Scene, node: NodeId, factor: f32) {
    let Some(bounds) = scene.bounding_box(node) else {
        return;
    };
    let center = bounds.center();
    let eye = center + Vector3::new(0.0, 0.0, bounds.diagonal() * factor);
    scene.camera_manager.look_from(eye, center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::scene::testing::{cube_node, test_scene},
        viewer::highlight::is_emphasized,
    };
    use cgmath::{Deg, InnerSpace, Quaternion, Rotation3};

    /// Pelvis group offset and rotated, holding three cubes, plus a Skull group.
    fn skeleton() -> (Scene, NodeId, [NodeId; 3], NodeId) {
        let mut scene = test_scene();
        let pelvis = scene.create_group("Pelvis");
        scene.node_mut(pelvis).unwrap().transform =
            Transform::from_translation(Vector3::new(0.0, 1.0, -2.0))
                .with_rotation(Quaternion::from_angle_y(Deg(40.0)));
        let cubes = [
            cube_node(&mut scene, "Pelvis", Vector3::new(-1.0, 0.0, 0.0), 0.25),
            cube_node(&mut scene, "Pelvis", Vector3::new(0.0, 0.0, 0.0), 0.25),
            cube_node(&mut scene, "Pelvis", Vector3::new(1.0, 0.0, 0.0), 0.25),
        ];
        for cube in cubes {
            scene.attach(cube, pelvis);
        }
        scene.add_to_root(pelvis);

        let skull = scene.create_group("Skull");
        let cranium = cube_node(&mut scene, "Skull", Vector3::new(0.0, 3.0, 0.0), 0.5);
        scene.attach(cranium, skull);
        scene.add_to_root(skull);
        (scene, pelvis, cubes, skull)
    }

    fn home() -> (Vector3<f32>, Vector3<f32>) {
        (Vector3::new(0.0, 5.0, 5.0), Vector3::new(0.0, 0.0, 0.0))
    }

    fn assert_matrix_close(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_isolate_then_restore_is_exact() {
        for preserve in [true, false] {
            let (mut scene, pelvis, cubes, skull) = skeleton();
            let mut state = ViewerState::new();
            let settings = IsolationSettings {
                preserve_world_transform: preserve,
                ..Default::default()
            };
            let middle = cubes[1];
            let before = scene.node(middle).unwrap().transform;
            let world_before = scene.world_matrix(middle);

            assert!(isolate(&mut state, &mut scene, middle, &settings));
            assert_eq!(scene.parent(middle), Some(scene.root()));
            assert!(!scene.is_effectively_visible(skull));
            assert!(scene.is_effectively_visible(pelvis));
            assert!(is_emphasized(&scene, middle));
            if preserve {
                assert_matrix_close(scene.world_matrix(middle), world_before);
            }

            assert!(restore(&mut state, &mut scene, home()));
            assert_eq!(scene.node(middle).unwrap().transform, before);
            assert_eq!(scene.parent(middle), Some(pelvis));
            assert_eq!(scene.children(pelvis), &cubes);
            assert_eq!(scene.top_level(), &[pelvis, skull]);
            assert!(scene.top_level().iter().all(|&id| scene.is_visible(id)));
            assert!(!is_emphasized(&scene, middle));
        }
    }

    #[test]
    fn test_world_transform_kept_under_uniform_scale() {
        let mut scene = test_scene();
        let group = scene.create_group("Scapula");
        scene.node_mut(group).unwrap().transform =
            Transform::from_translation(Vector3::new(2.0, -1.0, 0.5))
                .with_rotation(Quaternion::from_angle_x(Deg(30.0)))
                .with_scale(Vector3::new(2.5, 2.5, 2.5));
        let blade = cube_node(&mut scene, "Scapula", Vector3::new(0.5, 0.0, 0.0), 0.25);
        scene.node_mut(blade).unwrap().transform.rotation = Quaternion::from_angle_z(Deg(45.0));
        scene.attach(blade, group);
        scene.add_to_root(group);
        let world_before = scene.world_matrix(blade);

        let mut state = ViewerState::new();
        assert!(isolate(&mut state, &mut scene, blade, &IsolationSettings::default()));
        assert_matrix_close(scene.world_matrix(blade), world_before);
    }

    #[test]
    fn test_isolation_frames_bounds() {
        let (mut scene, _, _, skull) = skeleton();
        let mut state = ViewerState::new();
        let cranium = scene.children(skull)[0];

        isolate(&mut state, &mut scene, cranium, &IsolationSettings::default());

        let camera = &scene.camera_manager.camera;
        let center = Vector3::new(0.0, 3.0, 0.0);
        let expected_eye = center + Vector3::new(0.0, 0.0, 3.0f32.sqrt() * 2.0);
        assert!((camera.target - center).magnitude() < 1e-4);
        assert!((camera.eye - expected_eye).magnitude() < 1e-4);
        assert_eq!(state.info_panel.heading(), Some("Skull"));
    }

    #[test]
    fn test_switching_isolation_restores_first() {
        let (mut scene, pelvis, cubes, skull) = skeleton();
        let mut state = ViewerState::new();
        let settings = IsolationSettings::default();
        let cranium = scene.children(skull)[0];

        isolate(&mut state, &mut scene, cubes[0], &settings);
        assert!(isolate(&mut state, &mut scene, cranium, &settings));

        assert_eq!(state.isolated(), Some(cranium));
        assert_eq!(scene.children(pelvis), &cubes);
        assert!(!is_emphasized(&scene, cubes[0]));
        assert!(!scene.is_effectively_visible(cubes[0]));
        assert!(!isolate(&mut state, &mut scene, cranium, &settings));
    }

    #[test]
    fn test_restore_without_isolation_is_noop() {
        let (mut scene, ..) = skeleton();
        let mut state = ViewerState::new();
        let eye = scene.camera_manager.camera.eye;
        assert!(!restore(&mut state, &mut scene, home()));
        assert_eq!(scene.camera_manager.camera.eye, eye);
    }

    #[test]
    fn test_groups_cannot_be_isolated() {
        let (mut scene, pelvis, ..) = skeleton();
        let mut state = ViewerState::new();
        assert!(!isolate(&mut state, &mut scene, pelvis, &IsolationSettings::default()));
        assert!(!state.is_isolated());
    }
}
