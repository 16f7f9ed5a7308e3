use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One asset to load: the label it is registered under and its path,
/// relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub label: String,
    pub path: PathBuf,
}

impl ManifestEntry {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Load order of the bundled skeleton. Paired bones appear once per side and
/// share a label.
#[rustfmt::skip]
const FELINE_SKELETON: &[(&str, &str)] = &[
    ("Atlas", "atlas.obj"),
    ("Femur", "femur1.obj"),
    ("Femur", "femur2.obj"),
    ("Axis", "axis.obj"),
    ("Canine", "canine.obj"),
    ("Canine", "canine2.obj"),
    ("Canine", "canine3.obj"),
    ("Canine", "canine4.obj"),
    ("Calcaneum", "calcaneum.obj"),
    ("Carpus", "carpus1.obj"),
    ("Carpus", "carpus2.obj"),
    ("Cervical Vertebrae", "cervical_vertebrae.obj"),
    ("Caudal Vertebrae", "caudal_vertebrae.obj"),
    ("Fibula", "fibula1.obj"),
    ("Fibula", "fibula2.obj"),
    ("Humerus", "humerus1.obj"),
    ("Humerus", "humerus2.obj"),
    ("Lumbar Vertebrae", "lumbar_vertebrae.obj"),
    ("Mandible", "mandible.obj"),
    ("Metacarpus", "metacarpus1.obj"),
    ("Metacarpus", "metacarpus2.obj"),
    ("Metatarsus", "metatarsus1.obj"),
    ("Metatarsus", "metatarsus2.obj"),
    ("Patella", "patella1.obj"),
    ("Patella", "patella2.obj"),
    ("Pelvis", "pelvis.obj"),
    ("Phalanges", "phalanges1.obj"),
    ("Phalanges", "phalanges2.obj"),
    ("Phalanges", "phalanges3.obj"),
    ("Phalanges", "phalanges4.obj"),
    ("Radius", "radius1.obj"),
    ("Radius", "radius2.obj"),
    ("Costal Cartilage", "rib.obj"),
    ("Sacrum", "sacrum.obj"),
    ("Scapula", "scapula1.obj"),
    ("Scapula", "scapula2.obj"),
    ("Skull", "skull.obj"),
    ("Tarsus", "tarsus1.obj"),
    ("Tarsus", "tarsus2.obj"),
    ("Thoracic Vertebrae", "thoracic_vertebrae.obj"),
    ("Tibia", "tibia1.obj"),
    ("Tibia", "tibia2.obj"),
    ("Ulna", "ulna1.obj"),
    ("Ulna", "ulna2.obj"),
    ("Molar", "molar.obj"),
    ("Teeth", "teeth.obj"),
    ("Unnamed", "unnamed.obj"),
];

/// The bundled feline skeleton, in load order, under `bones/`.
pub fn default_manifest() -> Vec<ManifestEntry> {
    FELINE_SKELETON
        .iter()
        .map(|(label, file)| ManifestEntry::new(*label, PathBuf::from("bones").join(file)))
        .collect()
}
