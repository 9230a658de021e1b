// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest.

use serde::Deserialize;
use tracing::info;

use crate::core::error::ResolverResult;
use crate::core::http::fetch_json;

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Release type tag of stable versions.
pub const RELEASE_TYPE: &str = "release";

/// Top-level Mojang version manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    /// Per-version metadata document.
    pub url: String,
}

impl VersionManifest {
    /// Fetch the version manifest using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> ResolverResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let manifest: VersionManifest = fetch_json(client, url).await?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Official stable versions only, in manifest order (newest first).
    pub fn releases(&self) -> impl Iterator<Item = &VersionEntry> {
        self.versions
            .iter()
            .filter(|v| v.version_type == RELEASE_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest_entry() {
        let json = r#"{
            "id": "1.20.4",
            "type": "release",
            "releaseTime": "2023-12-07T08:00:00+00:00",
            "url": "https://example.com/1.20.4.json",
            "sha1": "abc123"
        }"#;
        let entry: VersionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1.20.4");
        assert_eq!(entry.version_type, "release");
        assert_eq!(entry.url, "https://example.com/1.20.4.json");
    }

    #[test]
    fn releases_skip_snapshots_and_keep_order() {
        let json = r#"{
            "latest": { "release": "1.20.1", "snapshot": "23w32a" },
            "versions": [
                { "id": "23w32a", "type": "snapshot", "url": "https://example.com/a.json" },
                { "id": "1.20.1", "type": "release", "url": "https://example.com/b.json" },
                { "id": "1.20", "type": "release", "url": "https://example.com/c.json" },
                { "id": "b1.7.3", "type": "old_beta", "url": "https://example.com/d.json" }
            ]
        }"#;
        let manifest: VersionManifest = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = manifest.releases().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1.20.1", "1.20"]);
        assert!(manifest.find_version("23w32a").is_some());
        assert!(manifest.find_version("1.7.10").is_none());
    }
}
