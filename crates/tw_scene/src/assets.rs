//! Asset manifest: where the scene's images and sound live, and the initial
//! slider speeds. Every field has a built-in default, so the manifest file is
//! optional; when present, any subset of fields may be overridden.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use tw_core::motion::SpeedSettings;

pub const MANIFEST_PATH: &str = "assets/scene.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SceneManifest {
    pub background: String,
    pub cloud: String,
    pub boat: String,
    pub tree: String,
    pub water: String,
    pub sound: String,
    pub speeds: SpeedSettings,
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self {
            background: "background2.png".to_string(),
            cloud: "cloud2.png".to_string(),
            boat: "boat2.png".to_string(),
            tree: "tree2.png".to_string(),
            water: "water3.png".to_string(),
            sound: "wave.wav".to_string(),
            speeds: SpeedSettings::default(),
        }
    }
}

pub fn load_manifest_from_path(path: &Path) -> Result<SceneManifest, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let manifest: SceneManifest = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse manifest JSON {}: {e}", path.display()))?;
    validate_manifest(&manifest)?;
    Ok(SceneManifest {
        speeds: manifest.speeds.clamped(),
        ..manifest
    })
}

/// Use the manifest at `path` if it exists, the built-in defaults otherwise.
pub fn resolve_manifest(path: &Path) -> Result<SceneManifest, String> {
    if path.exists() {
        let manifest = load_manifest_from_path(path)?;
        log::info!("Loaded scene manifest '{}'", path.display());
        Ok(manifest)
    } else {
        log::info!(
            "No scene manifest at '{}'; using built-in asset paths",
            path.display()
        );
        Ok(SceneManifest::default())
    }
}

fn validate_manifest(manifest: &SceneManifest) -> Result<(), String> {
    let fields = [
        ("background", &manifest.background),
        ("cloud", &manifest.cloud),
        ("boat", &manifest.boat),
        ("tree", &manifest.tree),
        ("water", &manifest.water),
        ("sound", &manifest.sound),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(format!("Manifest validation failed: '{name}' path is empty"));
        }
    }
    Ok(())
}

/// Read an asset file, naming it in the error.
pub fn read_asset(kind: &str, path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("Failed to read {kind} '{}': {e}", path.display()))
}
