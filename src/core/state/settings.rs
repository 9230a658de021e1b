use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::APP_USER_AGENT;
use crate::core::version::VERSION_MANIFEST_URL;

const APP_DIR_NAME: &str = "dockercraft";
const SETTINGS_FILE: &str = "settings.json";

/// Where each ecosystem publishes its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpstreamEndpoints {
    /// Mojang version manifest.
    pub vanilla_manifest: String,
    /// Fabric meta API root (`.../v2`).
    pub fabric_meta: String,
    /// Forge files site; pages live at `<root>/index_<version>.html`.
    pub forge_files: String,
    /// NeoForge maven directory listing.
    pub neoforge_listing: String,
    /// Quilt installer maven directory listing.
    pub quilt_listing: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            vanilla_manifest: VERSION_MANIFEST_URL.to_string(),
            fabric_meta: "https://meta.fabricmc.net/v2".to_string(),
            forge_files: "https://files.minecraftforge.net/net/minecraftforge/forge".to_string(),
            neoforge_listing: "https://maven.neoforged.net/releases/net/neoforged/neoforge/"
                .to_string(),
            quilt_listing:
                "https://maven.quiltmc.org/repository/release/org/quiltmc/quilt-installer/"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub endpoints: UpstreamEndpoints,
    /// Upper bound on concurrent availability probes.
    pub max_concurrent_probes: usize,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoints: UpstreamEndpoints::default(),
            max_concurrent_probes: 8,
            user_agent: APP_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the per-user settings file when it
    /// exists, or fall back to the defaults.
    pub fn load(path: Option<&Path>) -> ResolverResult<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match default_settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> ResolverResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ResolverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&raw)
            .map_err(|e| ResolverError::Settings(format!("{}: {}", path.display(), e)))?;

        if settings.max_concurrent_probes == 0 {
            return Err(ResolverError::Settings(format!(
                "{}: max_concurrent_probes must be at least 1",
                path.display()
            )));
        }

        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE))
}
