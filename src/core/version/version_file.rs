// ─── Version File ───
// The per-version metadata document referenced by the manifest. Only the
// parts needed to run a dedicated server are modeled.

use serde::Deserialize;

use crate::core::error::ResolverResult;
use crate::core::http::fetch_json;
use crate::core::java::LEGACY_JAVA_MAJOR;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    #[serde(default)]
    pub java_version: Option<JavaVersionInfo>,
    #[serde(default)]
    pub downloads: VersionDownloads,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionDownloads {
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
}

impl VersionJson {
    pub async fn fetch(client: &reqwest::Client, url: &str) -> ResolverResult<Self> {
        fetch_json(client, url).await
    }

    /// Java major version the server should run on. Old releases (1.6 and
    /// friends) don't publish one; they ran on Java 8.
    pub fn required_java_major(&self) -> u32 {
        self.java_version
            .as_ref()
            .map(|j| j.major_version)
            .unwrap_or(LEGACY_JAVA_MAJOR)
    }

    pub fn server_download(&self) -> Option<&DownloadArtifact> {
        self.downloads.server.as_ref()
    }
}
