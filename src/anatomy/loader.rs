//! Per-asset bone loading.
//!
//! Every manifest entry becomes its own task on a worker pool. Tasks report
//! back through a channel, and the event loop drains finished loads before
//! each frame with [`LoadPipeline::poll_completed`], so the scene is only ever
//! touched from one thread. Loads finish in any order and a failed load never
//! affects the others.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::{
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
    executor::ThreadPool,
    future::BoxFuture,
    FutureExt,
};
use thiserror::Error;

use crate::{
    anatomy::{descriptors, manifest::ManifestEntry, registry::ModelRegistry},
    gfx::{
        resources::material::Material,
        scene::{BoneTag, Mesh, NodeId, Scene},
    },
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("'{0}' contains no triangles")]
    Empty(PathBuf),
    #[error("failed to start loader pool: {0}")]
    Pool(#[from] std::io::Error),
}

/// Geometry of one asset, one mesh per object in the file.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub meshes: Vec<Mesh>,
}

/// Source of bone geometry. Implementations return a future that the
/// pipeline runs on a worker thread.
pub trait AssetLoader: Send + Sync + 'static {
    fn load(&self, path: &Path) -> BoxFuture<'static, Result<LoadedModel, LoadError>>;
}

/// Wavefront OBJ files resolved against an asset root.
#[derive(Debug, Clone)]
pub struct ObjLoader {
    root: PathBuf,
}

impl ObjLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for ObjLoader {
    fn load(&self, path: &Path) -> BoxFuture<'static, Result<LoadedModel, LoadError>> {
        let full_path = self.root.join(path);
        async move { read_obj(&full_path) }.boxed()
    }
}

/// Reads an OBJ file, triangulated and single-indexed. Materials in an
/// accompanying MTL are ignored; every bone shares one look.
pub fn read_obj(path: &Path) -> Result<LoadedModel, LoadError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| LoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let meshes: Vec<Mesh> = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            // Mesh::new falls back to face normals when these don't line up
            Mesh::new(mesh.positions, mesh.normals, mesh.indices)
        })
        .filter(|mesh| !mesh.is_empty())
        .collect();

    if meshes.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    Ok(LoadedModel { meshes })
}

/// Result of one finished load task.
#[derive(Debug)]
pub struct LoadCompletion {
    pub label: String,
    pub path: PathBuf,
    pub result: Result<LoadedModel, LoadError>,
}

/// Runs load tasks on a thread pool and hands results back to the caller's
/// thread. There is no cancellation and no timeout.
pub struct LoadPipeline {
    pool: ThreadPool,
    sender: UnboundedSender<LoadCompletion>,
    receiver: UnboundedReceiver<LoadCompletion>,
    pending: usize,
}

impl LoadPipeline {
    pub fn new(threads: usize) -> Result<Self, LoadError> {
        let pool = ThreadPool::builder()
            .pool_size(threads.max(1))
            .name_prefix("felis-loader-")
            .create()?;
        let (sender, receiver) = mpsc::unbounded();
        Ok(Self {
            pool,
            sender,
            receiver,
            pending: 0,
        })
    }

    /// Pool sized to the machine.
    pub fn with_default_threads() -> Result<Self, LoadError> {
        Self::new(num_cpus::get())
    }

    pub fn spawn(&mut self, loader: &Arc<dyn AssetLoader>, entry: ManifestEntry) {
        let ManifestEntry { label, path } = entry;
        let load = loader.load(&path);
        let sender = self.sender.clone();

        self.pending += 1;
        self.pool.spawn_ok(async move {
            let result = load.await;
            // The receiver only goes away with the pipeline itself.
            let _ = sender.unbounded_send(LoadCompletion {
                label,
                path,
                result,
            });
        });
    }

    pub fn spawn_all(
        &mut self,
        loader: &Arc<dyn AssetLoader>,
        entries: impl IntoIterator<Item = ManifestEntry>,
    ) {
        for entry in entries {
            self.spawn(loader, entry);
        }
        log::info!("Queued {} bone loads", self.pending);
    }

    /// Finished loads since the last call. Never blocks.
    pub fn poll_completed(&mut self) -> Vec<LoadCompletion> {
        let mut completed = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            completed.push(completion);
        }
        self.pending = self.pending.saturating_sub(completed.len());
        completed
    }

    /// Loads spawned but not yet drained.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

/// Adds a finished load to the scene and registry.
///
/// On success the asset becomes a group named after its label, with one
/// tagged child per mesh, attached to the scene root and registered under the
/// label. Failures are logged with their label and path and returned.
pub fn apply_completion(
    scene: &mut Scene,
    registry: &mut ModelRegistry,
    completion: LoadCompletion,
) -> Result<NodeId, LoadError> {
    let LoadCompletion {
        label,
        path,
        result,
    } = completion;

    let model = match result {
        Ok(model) => model,
        Err(err) => {
            log::error!("Error loading {label} from {}: {err}", path.display());
            return Err(err);
        }
    };

    let description = descriptors::describe(&label);
    let group = scene.create_group(label.as_str());
    let mesh_count = model.meshes.len();

    for mesh in model.meshes {
        let id = scene.create_mesh(label.as_str(), mesh, Material::bone());
        if let Some(node) = scene.node_mut(id) {
            node.bone = Some(BoneTag {
                label: label.clone(),
                description: description.to_string(),
            });
        }
        scene.attach(id, group);
    }

    scene.add_to_root(group);
    registry.register(label.as_str(), group);
    log::info!("Loaded {label} ({mesh_count} meshes) from {}", path.display());
    Ok(group)
}

#[cfg(test)]
mod tests {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    use super::*;
    use crate::gfx::scene::testing::{cube_mesh, test_scene};

    /// Serves cubes for every path except those containing "missing".
    struct CubeLoader;

    impl AssetLoader for CubeLoader {
        fn load(&self, path: &Path) -> BoxFuture<'static, Result<LoadedModel, LoadError>> {
            let path = path.to_path_buf();
            async move {
                if path.to_string_lossy().contains("missing") {
                    Err(LoadError::Empty(path))
                } else {
                    Ok(LoadedModel {
                        meshes: vec![cube_mesh(0.5)],
                    })
                }
            }
            .boxed()
        }
    }

    fn drain(pipeline: &mut LoadPipeline, expected: usize) -> Vec<LoadCompletion> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut done = Vec::new();
        while done.len() < expected && Instant::now() < deadline {
            done.extend(pipeline.poll_completed());
            thread::sleep(Duration::from_millis(5));
        }
        done
    }

    #[test]
    fn test_pipeline_reports_every_entry() {
        let loader: Arc<dyn AssetLoader> = Arc::new(CubeLoader);
        let mut pipeline = LoadPipeline::new(2).unwrap();
        pipeline.spawn_all(
            &loader,
            vec![
                ManifestEntry::new("Skull", "skull.obj"),
                ManifestEntry::new("Femur", "missing.obj"),
                ManifestEntry::new("Femur", "femur2.obj"),
            ],
        );

        let done = drain(&mut pipeline, 3);
        assert_eq!(done.len(), 3);
        assert_eq!(pipeline.pending(), 0);
        assert_eq!(done.iter().filter(|c| c.result.is_err()).count(), 1);
    }

    #[test]
    fn test_duplicate_labels_resolve_to_latest() {
        let mut scene = test_scene();
        let mut registry = ModelRegistry::new();

        let first = apply_completion(
            &mut scene,
            &mut registry,
            LoadCompletion {
                label: "Femur".into(),
                path: "femur1.obj".into(),
                result: Ok(LoadedModel {
                    meshes: vec![cube_mesh(0.5)],
                }),
            },
        )
        .unwrap();
        let second = apply_completion(
            &mut scene,
            &mut registry,
            LoadCompletion {
                label: "Femur".into(),
                path: "femur2.obj".into(),
                result: Ok(LoadedModel {
                    meshes: vec![cube_mesh(0.5)],
                }),
            },
        )
        .unwrap();

        assert_eq!(registry.get("Femur"), Some(second));
        assert_eq!(scene.top_level(), &[first, second]);
        assert_eq!(scene.visible_meshes().len(), 2);
    }

    #[test]
    fn test_meshes_carry_label_and_description() {
        let mut scene = test_scene();
        let mut registry = ModelRegistry::new();
        let group = apply_completion(
            &mut scene,
            &mut registry,
            LoadCompletion {
                label: "Skull".into(),
                path: "skull.obj".into(),
                result: Ok(LoadedModel {
                    meshes: vec![cube_mesh(0.5), cube_mesh(0.25)],
                }),
            },
        )
        .unwrap();

        assert_eq!(scene.node(group).unwrap().name, "Skull");
        let children = scene.children(group).to_vec();
        assert_eq!(children.len(), 2);
        for child in children {
            let node = scene.node(child).unwrap();
            assert_eq!(node.name, "Skull");
            let tag = node.bone.as_ref().unwrap();
            assert_eq!(tag.description, descriptors::describe("Skull"));
            assert!(!node.mesh().unwrap().material.is_emphasized());
        }
    }

    #[test]
    fn test_failed_load_leaves_scene_untouched() {
        let mut scene = test_scene();
        let mut registry = ModelRegistry::new();
        let result = apply_completion(
            &mut scene,
            &mut registry,
            LoadCompletion {
                label: "Teeth".into(),
                path: "teeth.obj".into(),
                result: Err(LoadError::Empty("teeth.obj".into())),
            },
        );

        assert!(result.is_err());
        assert!(scene.top_level().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_read_obj_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let model = ObjLoader::new(dir.path())
            .load(Path::new("tri.obj"))
            .now_or_never()
            .unwrap()
            .unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].index_count(), 3);

        assert!(matches!(
            read_obj(&dir.path().join("absent.obj")),
            Err(LoadError::Obj { .. })
        ));
    }
}
