use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEVICE_TYPE: &str = "SenseCap K1100";

/// Display names for known sensors and controllable lights, keyed by id.
/// Loaded once at startup; Helium exposes no naming API so the names live in
/// a TOML file next to the deployment (compiled-in defaults when unset).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Registry {
    #[serde(default)]
    pub devices: BTreeMap<String, String>,
    #[serde(default)]
    pub lights: BTreeMap<String, String>,
}

impl Registry {
    pub fn load(path: Option<&str>) -> Result<Registry, Box<dyn std::error::Error>> {
        match path {
            Some(path) => Registry::load_from_file(path),
            None => Ok(Registry::defaults()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Registry, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(&path)?;
        let registry: Registry = toml::from_str(&content)?;
        Ok(registry)
    }

    pub fn device_name(&self, device_eui: &str) -> String {
        self.devices
            .get(device_eui)
            .cloned()
            .unwrap_or_else(|| format!("Capteur {}", device_eui))
    }

    pub fn light_ids(&self) -> Vec<String> {
        self.lights.keys().cloned().collect()
    }

    fn defaults() -> Registry {
        let devices = BTreeMap::from([
            ("2cf7f1c04400049d".to_string(), "Capteur Jardin".to_string()),
            ("2cf7f1c04280021c".to_string(), "Capteur Salle de bain".to_string()),
            ("2cf7f1c04280041c".to_string(), "Capteur Salon".to_string()),
        ]);
        let lights = BTreeMap::from([
            (
                "5c8f3a2e-9b41-4c6d-8f1a-2e7b9d4c6a10".to_string(),
                "Lampe Salon".to_string(),
            ),
            (
                "b3d91f74-6c2e-4e8b-a5d0-1f9c8e7a3b52".to_string(),
                "Lampe Jardin".to_string(),
            ),
            (
                "e7a24c58-3f1b-4d9e-b6c7-8a5d2f0e9c31".to_string(),
                "Lampe Bureau".to_string(),
            ),
        ]);

        Registry { devices, lights }
    }
}
