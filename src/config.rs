//! Viewer configuration
//!
//! Everything has a default, so an empty JSON object (or no file at all) gives
//! the stock feline skeleton viewer. Missing fields fall back individually.

use std::path::{Path, PathBuf};

use cgmath::{Deg, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    anatomy::manifest::{default_manifest, ManifestEntry},
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        picking::CanvasRect,
        resources::material::EmphasisCue,
    },
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory manifest paths are resolved against
    pub asset_root: PathBuf,
    pub manifest: Vec<ManifestEntry>,
    pub window: WindowSettings,
    pub layout: ViewportLayout,
    pub camera: CameraSettings,
    pub isolation: IsolationSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            manifest: default_manifest(),
            window: WindowSettings::default(),
            layout: ViewportLayout::default(),
            camera: CameraSettings::default(),
            isolation: IsolationSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.layout.canvas_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "layout.canvas_fraction must be in (0, 1], got {fraction}"
            )));
        }
        if !(self.camera.znear > 0.0 && self.camera.znear < self.camera.zfar) {
            return Err(ConfigError::Invalid(
                "camera.znear must be positive and below camera.zfar".to_string(),
            ));
        }
        if self.isolation.framing_factor <= 0.0 {
            return Err(ConfigError::Invalid(
                "isolation.framing_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title: "Feline Skeleton".to_string(),
        }
    }
}

/// Where the 3D canvas sits in the window: the left `canvas_fraction` of the
/// width, below a `header_height` band. The info panel takes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportLayout {
    pub canvas_fraction: f32,
    pub header_height: f32,
}

impl Default for ViewportLayout {
    fn default() -> Self {
        Self {
            canvas_fraction: 2.0 / 3.0,
            header_height: 120.0,
        }
    }
}

impl ViewportLayout {
    /// Canvas rectangle for the current window size, in window pixels.
    pub fn canvas_rect(&self, window_width: f32, window_height: f32) -> CanvasRect {
        CanvasRect::new(
            0.0,
            self.header_height.min(window_height),
            (window_width * self.canvas_fraction).max(0.0),
            (window_height - self.header_height).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Where the camera starts
    pub initial_eye: [f32; 3],
    pub initial_target: [f32; 3],
    /// Where returning to the full model puts the camera
    pub home_eye: [f32; 3],
    pub home_target: [f32; 3],
    /// Fraction of pending orbit motion applied per frame
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            initial_eye: [0.0, 2.0, 5.0],
            initial_target: [0.0, 0.0, 0.0],
            home_eye: [0.0, 5.0, 5.0],
            home_target: [0.0, 0.0, 0.0],
            damping: 0.1,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
        }
    }
}

impl CameraSettings {
    pub fn home(&self) -> (Vector3<f32>, Vector3<f32>) {
        (self.home_eye.into(), self.home_target.into())
    }

    /// Camera and controller at the initial pose.
    pub fn build(&self, aspect: f32) -> CameraManager {
        let mut camera = OrbitCamera::new(1.0, 0.0, 0.0, self.initial_target.into(), aspect)
            .with_projection(Deg(self.fov_degrees), self.znear, self.zfar);
        camera.look_from(self.initial_eye.into(), self.initial_target.into());
        camera.update_view_proj();

        let controller = CameraController::new(self.rotate_speed, self.zoom_speed)
            .with_pan_speed(self.pan_speed)
            .with_damping(self.damping);
        CameraManager::new(camera, controller)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationSettings {
    /// Camera distance from an isolated bone, in multiples of its diagonal
    pub framing_factor: f32,
    /// Keep an isolated bone where it was on screen when it is reparented
    /// under the scene root. Exact only for shear-free parent chains: a
    /// non-uniformly scaled parent over a rotated bone cannot be expressed as
    /// a single TRS transform. When false only its local transform is kept.
    pub preserve_world_transform: bool,
    pub emphasis_color: [f32; 3],
    pub emphasis_intensity: f32,
}

impl Default for IsolationSettings {
    fn default() -> Self {
        let cue = EmphasisCue::default();
        Self {
            framing_factor: 2.0,
            preserve_world_transform: true,
            emphasis_color: cue.color,
            emphasis_intensity: cue.intensity,
        }
    }
}

impl IsolationSettings {
    pub fn cue(&self) -> EmphasisCue {
        EmphasisCue {
            color: self.emphasis_color,
            intensity: self.emphasis_intensity,
        }
    }
}
