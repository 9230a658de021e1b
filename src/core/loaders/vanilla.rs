use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::parse_url;
use crate::core::version::{GameVersion, VersionJson, VersionManifest};

use super::descriptor::{add_to_home, RuntimeDescriptor};
use super::loader_type::LoaderType;
use super::provider::{ensure_resolvable, RuntimeProvider};

const EXECUTABLE: &str = "server.jar";
const START_COMMAND: &str = "java $(cat user_jvm_args.txt) -jar server.jar $@";

/// Official Mojang server releases.
///
/// The manifest and each per-version metadata document are fetched at most
/// once per provider, even when many probes ask for them at the same time.
pub struct VanillaProvider {
    client: reqwest::Client,
    manifest_url: String,
    manifest: OnceCell<VersionManifest>,
    version_files: Mutex<HashMap<String, Arc<OnceCell<VersionJson>>>>,
}

impl VanillaProvider {
    pub fn new(client: reqwest::Client, manifest_url: String) -> Self {
        Self {
            client,
            manifest_url,
            manifest: OnceCell::new(),
            version_files: Mutex::new(HashMap::new()),
        }
    }

    pub async fn manifest(&self) -> ResolverResult<&VersionManifest> {
        self.manifest
            .get_or_try_init(|| VersionManifest::fetch(&self.client, &self.manifest_url))
            .await
    }

    /// Every release in manifest order (newest first).
    pub async fn release_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        Ok(self
            .manifest()
            .await?
            .releases()
            .map(|entry| GameVersion::new(entry.id.clone()))
            .collect())
    }

    async fn metadata_url(&self, minecraft: &str) -> ResolverResult<String> {
        self.manifest()
            .await?
            .find_version(minecraft)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| {
                ResolverError::VersionNotFound(format!(
                    "Minecraft {} is not in the version manifest",
                    minecraft
                ))
            })
    }

    /// Metadata document of one version. Unknown versions are
    /// `VersionNotFound`.
    pub async fn version_info(&self, minecraft: &str) -> ResolverResult<VersionJson> {
        let url = self.metadata_url(minecraft).await?;

        let cell = {
            let mut files = self
                .version_files
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(files.entry(minecraft.to_string()).or_default())
        };

        let info = cell
            .get_or_try_init(|| VersionJson::fetch(&self.client, &url))
            .await?;
        Ok(info.clone())
    }
}

#[async_trait]
impl RuntimeProvider for VanillaProvider {
    fn loader_type(&self) -> LoaderType {
        LoaderType::Vanilla
    }

    async fn available_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        self.release_versions().await
    }

    async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor> {
        ensure_resolvable(LoaderType::Vanilla, version)?;

        let info = self.version_info(&version.minecraft).await?;
        let metadata_url = self.metadata_url(&version.minecraft).await?;
        let server = info.server_download().ok_or_else(|| {
            ResolverError::malformed(
                &metadata_url,
                format!("Minecraft {} has no server download", version.minecraft),
            )
        })?;
        parse_url(&metadata_url, &server.url)?;
        let url = server.url.clone();

        info!("Resolved vanilla {} -> {}", version.minecraft, url);

        Ok(RuntimeDescriptor::new(
            LoaderType::Vanilla,
            version.base(),
            url.clone(),
            EXECUTABLE,
            vec![add_to_home(&url, EXECUTABLE)],
            START_COMMAND.to_string(),
            Some(info.required_java_major()),
        ))
    }
}
