use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::core::error::{ResolverError, ResolverResult};
use crate::core::version::GameVersion;

use super::{
    context::ProviderContext, descriptor::RuntimeDescriptor, fabric::FabricProvider,
    forge::ForgeProvider, loader_type::LoaderType, neoforge::NeoForgeProvider,
    quilt::QuiltProvider, vanilla::VanillaProvider,
};

/// One server ecosystem: which versions exist and how to turn one of them
/// into a [`RuntimeDescriptor`].
#[async_trait]
pub trait RuntimeProvider: Send + Sync {
    fn loader_type(&self) -> LoaderType;

    /// Base versions (no loader pin) that can be resolved, newest first.
    async fn available_versions(&self) -> ResolverResult<Vec<GameVersion>>;

    /// Every resolvable identifier. Loader ecosystems that know their
    /// loader builds return one entry per (base, loader) pair.
    async fn enumerate_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        self.available_versions().await
    }

    async fn latest_version(&self) -> ResolverResult<GameVersion> {
        self.available_versions()
            .await?
            .into_iter()
            .max()
            .ok_or(ResolverError::NoVersionsFound(self.loader_type()))
    }

    async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor>;
}

/// Reject what no provider can resolve: unexpanded sentinels, and loader
/// pins for an ecosystem without a loader.
pub(crate) fn ensure_resolvable(loader: LoaderType, version: &GameVersion) -> ResolverResult<()> {
    if version.is_sentinel() {
        return Err(ResolverError::InvalidGameVersion(format!(
            "'{}' must be expanded before resolving",
            version.minecraft
        )));
    }
    if !loader.is_modded() && version.loader.is_some() {
        return Err(ResolverError::InvalidGameVersion(format!(
            "{} has no mod loader, cannot pin '{}'",
            loader.description(),
            version
        )));
    }
    Ok(())
}

/// Closed set of ecosystems, dispatched without boxing.
pub enum Provider {
    Vanilla(Arc<VanillaProvider>),
    Fabric(FabricProvider),
    Forge(ForgeProvider),
    NeoForge(NeoForgeProvider),
    Quilt(QuiltProvider),
}

impl Provider {
    pub fn new(loader: LoaderType, ctx: ProviderContext) -> Self {
        match loader {
            LoaderType::Vanilla => Self::Vanilla(Arc::clone(&ctx.vanilla)),
            LoaderType::Fabric => Self::Fabric(FabricProvider::new(ctx)),
            LoaderType::Forge => Self::Forge(ForgeProvider::new(ctx)),
            LoaderType::NeoForge => Self::NeoForge(NeoForgeProvider::new(ctx)),
            LoaderType::Quilt => Self::Quilt(QuiltProvider::new(ctx)),
        }
    }

    fn inner(&self) -> &dyn RuntimeProvider {
        match self {
            Provider::Vanilla(p) => p.as_ref(),
            Provider::Fabric(p) => p,
            Provider::Forge(p) => p,
            Provider::NeoForge(p) => p,
            Provider::Quilt(p) => p,
        }
    }

    pub fn loader_type(&self) -> LoaderType {
        self.inner().loader_type()
    }

    pub async fn available_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        self.inner().available_versions().await
    }

    pub async fn enumerate_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        self.inner().enumerate_versions().await
    }

    pub async fn latest_version(&self) -> ResolverResult<GameVersion> {
        self.inner().latest_version().await
    }

    pub async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor> {
        self.inner().resolve(version).await
    }

    /// Replace `latest` and `all` with the concrete versions they stand for.
    pub async fn expand(&self, version: &GameVersion) -> ResolverResult<Vec<GameVersion>> {
        if version.is_latest() {
            let latest = self.latest_version().await?;
            info!("Latest {} version is {}", self.loader_type(), latest);
            Ok(vec![latest])
        } else if version.is_all() {
            let all = self.available_versions().await?;
            info!("Expanded 'all' to {} {} versions", all.len(), self.loader_type());
            Ok(all)
        } else {
            Ok(vec![version.clone()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_not_resolvable() {
        for loader in LoaderType::ALL {
            assert!(matches!(
                ensure_resolvable(loader, &GameVersion::latest()),
                Err(ResolverError::InvalidGameVersion(_))
            ));
            assert!(ensure_resolvable(loader, &GameVersion::all()).is_err());
        }
    }

    #[test]
    fn only_loader_ecosystems_accept_pins() {
        let pinned = GameVersion::with_loader("1.20.1", "47.1.0");
        assert!(ensure_resolvable(LoaderType::Vanilla, &pinned).is_err());
        assert!(ensure_resolvable(LoaderType::Forge, &pinned).is_ok());
        assert!(ensure_resolvable(LoaderType::Vanilla, &pinned.base()).is_ok());
    }
}
