use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::availability::probe_versions;
use super::context::ProviderContext;
use super::descriptor::{add_to_home, RuntimeDescriptor};
use super::loader_type::LoaderType;
use super::provider::{ensure_resolvable, RuntimeProvider};
use super::vanilla::VanillaProvider;
use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::{fetch_json, join_url, parse_url};
use crate::core::version::GameVersion;

const EXECUTABLE: &str = "fabric_server.jar";
const START_COMMAND: &str = "java $(cat user_jvm_args.txt) -jar fabric_server.jar nogui $@";

/// Loader versions carrying build metadata (`0.15.0+build.1`) are never
/// picked.
const BUILD_METADATA: char = '+';

/// One row of `/versions/loader/<minecraft>`.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricLoaderEntry {
    pub loader: FabricComponent,
    pub intermediary: FabricComponent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FabricComponent {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}

/// One row of `/versions/installer`.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricInstallerEntry {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}

impl FabricLoaderEntry {
    fn is_selectable(&self) -> bool {
        !self.loader.version.contains(BUILD_METADATA)
    }

    fn is_stable(&self) -> bool {
        self.loader.stable && self.intermediary.stable
    }
}

/// Pinned: that exact loader. Otherwise the first stable loader with a
/// stable intermediary.
pub fn select_loader<'a>(
    entries: &'a [FabricLoaderEntry],
    pinned: Option<&str>,
) -> Option<&'a FabricLoaderEntry> {
    let mut candidates = entries.iter().filter(|e| e.is_selectable());
    match pinned {
        Some(pinned) => candidates.find(|e| e.loader.version == pinned),
        None => candidates.find(|e| e.is_stable()),
    }
}

/// First stable installer, else the first one listed.
pub fn select_installer(entries: &[FabricInstallerEntry]) -> Option<&FabricInstallerEntry> {
    entries.iter().find(|i| i.stable).or_else(|| entries.first())
}

pub struct FabricProvider {
    client: reqwest::Client,
    meta_url: String,
    concurrency: usize,
    vanilla: Arc<VanillaProvider>,
}

impl FabricProvider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self {
            client: ctx.http_client,
            meta_url: ctx.endpoints.fabric_meta,
            concurrency: ctx.max_concurrent_probes,
            vanilla: ctx.vanilla,
        }
    }

    async fn fetch_loaders(&self, minecraft: &str) -> ResolverResult<Vec<FabricLoaderEntry>> {
        let url = join_url(&self.meta_url, &format!("versions/loader/{}", minecraft));
        fetch_json(&self.client, &url).await
    }

    async fn fetch_installers(&self) -> ResolverResult<Vec<FabricInstallerEntry>> {
        let url = join_url(&self.meta_url, "versions/installer");
        fetch_json(&self.client, &url).await
    }

    /// Selectable loader versions for one base version, unstable included.
    async fn loader_versions(&self, minecraft: &str) -> ResolverResult<Vec<String>> {
        let versions: Vec<String> = self
            .fetch_loaders(minecraft)
            .await?
            .into_iter()
            .filter(|e| e.is_selectable())
            .map(|e| e.loader.version)
            .collect();

        if versions.is_empty() {
            return Err(ResolverError::VersionNotFound(format!(
                "no Fabric loader for Minecraft {}",
                minecraft
            )));
        }
        Ok(versions)
    }

    async fn probe_releases(&self) -> ResolverResult<Vec<(GameVersion, Vec<String>)>> {
        let releases = self.vanilla.release_versions().await?;
        Ok(probe_versions(releases, self.concurrency, |v| async move {
            self.loader_versions(&v.minecraft).await
        })
        .await)
    }
}

#[async_trait]
impl RuntimeProvider for FabricProvider {
    fn loader_type(&self) -> LoaderType {
        LoaderType::Fabric
    }

    async fn available_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        Ok(self
            .probe_releases()
            .await?
            .into_iter()
            .map(|(version, _)| version)
            .collect())
    }

    async fn enumerate_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        Ok(self
            .probe_releases()
            .await?
            .into_iter()
            .flat_map(|(base, loaders)| {
                loaders
                    .into_iter()
                    .map(move |loader| GameVersion::with_loader(base.minecraft.clone(), loader))
            })
            .collect())
    }

    async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor> {
        ensure_resolvable(LoaderType::Fabric, version)?;
        let minecraft = version.minecraft.as_str();

        let java = self.vanilla.version_info(minecraft).await?.required_java_major();
        let (loaders, installers) =
            tokio::try_join!(self.fetch_loaders(minecraft), self.fetch_installers())?;

        let loader = select_loader(&loaders, version.loader.as_deref()).ok_or_else(|| {
            ResolverError::VersionNotFound(match &version.loader {
                Some(pinned) => format!("Fabric loader {} for Minecraft {}", pinned, minecraft),
                None => format!("no stable Fabric loader for Minecraft {}", minecraft),
            })
        })?;
        let installer = select_installer(&installers).ok_or_else(|| {
            ResolverError::VersionNotFound("no Fabric installer published".to_string())
        })?;

        let url = join_url(
            &self.meta_url,
            &format!(
                "versions/loader/{}/{}/{}/server/jar",
                minecraft, loader.loader.version, installer.version
            ),
        );
        parse_url(&self.meta_url, &url)?;

        info!(
            "Resolved Fabric {} (loader {}, installer {})",
            minecraft, loader.loader.version, installer.version
        );

        Ok(RuntimeDescriptor::new(
            LoaderType::Fabric,
            GameVersion::with_loader(minecraft, loader.loader.version.clone()),
            url.clone(),
            EXECUTABLE,
            vec![add_to_home(&url, EXECUTABLE)],
            START_COMMAND.to_string(),
            Some(java),
        ))
    }
}
