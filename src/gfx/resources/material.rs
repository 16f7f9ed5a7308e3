//! Surface material with an emissive highlight channel
//!
//! Every bone mesh owns one `Material`. Hover and isolation highlighting both
//! write to the emissive colour and intensity, so the two share one visual
//! channel.

use serde::{Deserialize, Serialize};

/// Emissive colour and strength used to highlight a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmphasisCue {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for EmphasisCue {
    fn default() -> Self {
        Self {
            color: [1.0, 0.0, 0.0],
            intensity: 0.5,
        }
    }
}

/// GPU-facing material parameters, padded to 16-byte rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// rgb = emissive colour premultiplied by intensity
    pub emissive: [f32; 4],
    /// x = metallic, y = roughness
    pub surface: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
        }
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Matte off-white used for every loaded bone (0xf0e6d2).
    pub fn bone() -> Self {
        Self::new("Bone", [0.941, 0.902, 0.824, 1.0], 0.1, 0.7)
    }

    pub fn emphasize(&mut self, cue: EmphasisCue) {
        self.emissive = cue.color;
        self.emissive_intensity = cue.intensity.max(0.0);
    }

    pub fn clear_emphasis(&mut self) {
        self.emissive = [0.0, 0.0, 0.0];
        self.emissive_intensity = 0.0;
    }

    pub fn is_emphasized(&self) -> bool {
        self.emissive_intensity > 0.0 && self.emissive.iter().any(|c| *c > 0.0)
    }

    pub fn uniform(&self) -> MaterialUniform {
        let [r, g, b] = self.emissive;
        let k = self.emissive_intensity;
        MaterialUniform {
            base_color: self.base_color,
            emissive: [r * k, g * k, b * k, 1.0],
            surface: [self.metallic, self.roughness, 0.0, 0.0],
        }
    }
}
