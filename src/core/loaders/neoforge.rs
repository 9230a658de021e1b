use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use super::availability::probe_versions;
use super::context::ProviderContext;
use super::descriptor::{run_installer, RuntimeDescriptor};
use super::listing::fetch_listing;
use super::loader_type::LoaderType;
use super::provider::{ensure_resolvable, RuntimeProvider};
use super::vanilla::VanillaProvider;
use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::{join_url, parse_url};
use crate::core::version::GameVersion;

const EXECUTABLE: &str = "neoforge_installer.jar";
const INSTALL_ARGS: &str = "--install-server /minecraft";
const START_COMMAND: &str = "bash run.sh --nogui $@";

/// NeoForge numbers its builds after the game: `1.20.2` → `20.2.x`,
/// `1.21` → `21.0.x`.
pub fn build_prefix(minecraft: &GameVersion) -> String {
    let [_, minor, patch] = minecraft.minecraft_components();
    format!("{}.{}.", minor, patch)
}

/// Pinned: that exact build. Otherwise the last build of the listing that
/// belongs to the base version.
pub fn select_build<'a>(
    listing: &'a [String],
    version: &GameVersion,
) -> Option<&'a String> {
    match &version.loader {
        Some(pinned) => listing.iter().find(|build| *build == pinned),
        None => {
            let prefix = build_prefix(version);
            listing.iter().rev().find(|build| build.starts_with(&prefix))
        }
    }
}

pub struct NeoForgeProvider {
    client: reqwest::Client,
    listing_url: String,
    concurrency: usize,
    vanilla: Arc<VanillaProvider>,
    listing: OnceCell<Vec<String>>,
}

impl NeoForgeProvider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self {
            client: ctx.http_client,
            listing_url: ctx.endpoints.neoforge_listing,
            concurrency: ctx.max_concurrent_probes,
            vanilla: ctx.vanilla,
            listing: OnceCell::new(),
        }
    }

    async fn listing(&self) -> ResolverResult<&[String]> {
        let listing = self
            .listing
            .get_or_try_init(|| fetch_listing(&self.client, &self.listing_url))
            .await?;
        Ok(listing)
    }

    fn installer_url(&self, build: &str) -> String {
        join_url(
            &self.listing_url,
            &format!("{}/neoforge-{}-installer.jar", build, build),
        )
    }

    /// Every build of the listing matching each release.
    async fn probe_releases(&self) -> ResolverResult<Vec<(GameVersion, Vec<String>)>> {
        let listing = self.listing().await?;
        let releases = self.vanilla.release_versions().await?;

        Ok(probe_versions(releases, self.concurrency, |v| async move {
            let prefix = build_prefix(&v);
            let builds: Vec<String> = listing
                .iter()
                .filter(|build| build.starts_with(&prefix))
                .cloned()
                .collect();
            if builds.is_empty() {
                return Err(ResolverError::VersionNotFound(format!(
                    "no NeoForge build for Minecraft {}",
                    v.minecraft
                )));
            }
            Ok(builds)
        })
        .await)
    }
}

#[async_trait]
impl RuntimeProvider for NeoForgeProvider {
    fn loader_type(&self) -> LoaderType {
        LoaderType::NeoForge
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
            .flat_map(|(base, builds)| {
                builds
                    .into_iter()
                    .map(move |build| GameVersion::with_loader(base.minecraft.clone(), build))
            })
            .collect())
    }

    async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor> {
        ensure_resolvable(LoaderType::NeoForge, version)?;
        let minecraft = version.minecraft.as_str();

        let java = self.vanilla.version_info(minecraft).await?.required_java_major();
        let listing = self.listing().await?;
        let build = select_build(listing, version).ok_or_else(|| {
            ResolverError::VersionNotFound(match &version.loader {
                Some(pinned) => format!("NeoForge {} for Minecraft {}", pinned, minecraft),
                None => format!("no NeoForge build for Minecraft {}", minecraft),
            })
        })?;

        let url = self.installer_url(build);
        parse_url(&self.listing_url, &url)?;

        info!("Resolved NeoForge {} -> {}", minecraft, build);

        Ok(RuntimeDescriptor::new(
            LoaderType::NeoForge,
            GameVersion::with_loader(minecraft, build.clone()),
            url.clone(),
            EXECUTABLE,
            run_installer(&url, EXECUTABLE, INSTALL_ARGS),
            START_COMMAND.to_string(),
            Some(java),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<String> {
        ["20.2.3-beta", "20.2.86", "20.4.237", "21.0.0-beta", "21.0.167", "21.1.72"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn prefix_pads_the_patch_component() {
        assert_eq!(build_prefix(&GameVersion::new("1.20.2")), "20.2.");
        assert_eq!(build_prefix(&GameVersion::new("1.21")), "21.0.");
        assert_eq!(build_prefix(&GameVersion::new("1.21.1")), "21.1.");
    }

    #[test]
    fn last_matching_entry_wins() {
        let listing = listing();
        assert_eq!(
            select_build(&listing, &GameVersion::new("1.20.2")).unwrap(),
            "20.2.86"
        );
        assert_eq!(
            select_build(&listing, &GameVersion::new("1.21")).unwrap(),
            "21.0.167"
        );
        assert!(select_build(&listing, &GameVersion::new("1.19.2")).is_none());
    }

    #[test]
    fn pins_match_exactly() {
        let listing = listing();
        let pinned = GameVersion::with_loader("1.20.2", "20.2.3-beta");
        assert_eq!(select_build(&listing, &pinned).unwrap(), "20.2.3-beta");

        let partial = GameVersion::with_loader("1.20.2", "20.2");
        assert!(select_build(&listing, &partial).is_none());
    }
}
