use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use super::context::ProviderContext;
use super::descriptor::{run_installer, RuntimeDescriptor};
use super::listing::fetch_listing;
use super::loader_type::LoaderType;
use super::provider::{ensure_resolvable, RuntimeProvider};
use super::vanilla::VanillaProvider;
use crate::core::build::defaults::HOME_DIRECTORY;
use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::{join_url, parse_url};
use crate::core::version::{compare_versions, GameVersion};

const EXECUTABLE: &str = "quilt_installer.jar";
const START_COMMAND: &str = "java $(cat user_jvm_args.txt) -jar quilt-server-launch.jar $@";

/// Quilt ships one universal installer; the game version is an argument.
fn install_args(minecraft: &str) -> String {
    format!(
        "install server {} --install-dir={} --download-server",
        minecraft, HOME_DIRECTORY
    )
}

/// Pinned: that exact installer. Otherwise the highest installer version;
/// on equal versions the later entry wins.
pub fn select_installer<'a>(listing: &'a [String], pinned: Option<&str>) -> Option<&'a String> {
    match pinned {
        Some(pinned) => listing.iter().find(|v| *v == pinned),
        None => listing.iter().max_by(|a, b| compare_versions(a, b)),
    }
}

pub struct QuiltProvider {
    client: reqwest::Client,
    listing_url: String,
    vanilla: Arc<VanillaProvider>,
    listing: OnceCell<Vec<String>>,
}

impl QuiltProvider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self {
            client: ctx.http_client,
            listing_url: ctx.endpoints.quilt_listing,
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
}

#[async_trait]
impl RuntimeProvider for QuiltProvider {
    fn loader_type(&self) -> LoaderType {
        LoaderType::Quilt
    }

    /// Every vanilla release; the installer supports them all.
    async fn available_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        self.vanilla.release_versions().await
    }

    async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor> {
        ensure_resolvable(LoaderType::Quilt, version)?;
        let minecraft = version.minecraft.as_str();

        let java = self.vanilla.version_info(minecraft).await?.required_java_major();
        let listing = self.listing().await?;
        let installer = select_installer(listing, version.loader.as_deref()).ok_or_else(|| {
            ResolverError::VersionNotFound(match &version.loader {
                Some(pinned) => format!("Quilt installer {}", pinned),
                None => "no Quilt installer published".to_string(),
            })
        })?;

        let url = join_url(
            &self.listing_url,
            &format!("{}/quilt-installer-{}.jar", installer, installer),
        );
        parse_url(&self.listing_url, &url)?;

        info!("Resolved Quilt {} with installer {}", minecraft, installer);

        Ok(RuntimeDescriptor::new(
            LoaderType::Quilt,
            GameVersion::with_loader(minecraft, installer.clone()),
            url.clone(),
            EXECUTABLE,
            run_installer(&url, EXECUTABLE, &install_args(minecraft)),
            START_COMMAND.to_string(),
            Some(java),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn highest_installer_is_picked_regardless_of_order() {
        let listing = listing(&["0.3.1", "0.9.2", "0.10.0", "0.4.0"]);
        assert_eq!(select_installer(&listing, None).unwrap(), "0.10.0");
    }

    #[test]
    fn ties_go_to_the_later_entry() {
        let listing = listing(&["0.9.0", "0.9", "0.8.0"]);
        assert_eq!(select_installer(&listing, None).unwrap(), "0.9");
    }

    #[test]
    fn pinned_installer_must_exist() {
        let listing = listing(&["0.9.0", "0.9.1"]);
        assert_eq!(select_installer(&listing, Some("0.9.0")).unwrap(), "0.9.0");
        assert!(select_installer(&listing, Some("0.9.2")).is_none());
        assert!(select_installer(&[], None).is_none());
    }

    #[test]
    fn installer_runs_against_the_server_directory() {
        assert_eq!(
            install_args("1.20.1"),
            "install server 1.20.1 --install-dir=/minecraft --download-server"
        );
    }
}
