use std::sync::Arc;

use reqwest::Client;

use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::build_http_client;
use crate::core::loaders::{LoaderType, Provider, ProviderContext, VanillaProvider};

use super::settings::Settings;

/// Everything a command needs to resolve versions: the settings, one HTTP
/// client, and one vanilla provider shared by every loader provider so
/// the Mojang manifest is fetched once per process.
pub struct AppState {
    pub settings: Settings,
    pub http_client: Client,
    vanilla: Arc<VanillaProvider>,
}

impl AppState {
    pub fn new(settings: Settings) -> ResolverResult<Self> {
        let http_client = build_http_client(&settings.user_agent)
            .map_err(|e| ResolverError::Settings(format!("Failed to build HTTP client: {}", e)))?;
        let vanilla = Arc::new(VanillaProvider::new(
            http_client.clone(),
            settings.endpoints.vanilla_manifest.clone(),
        ));

        Ok(Self {
            settings,
            http_client,
            vanilla,
        })
    }

    pub fn provider_context(&self) -> ProviderContext {
        ProviderContext {
            http_client: self.http_client.clone(),
            endpoints: self.settings.endpoints.clone(),
            max_concurrent_probes: self.settings.max_concurrent_probes,
            vanilla: Arc::clone(&self.vanilla),
        }
    }

    pub fn provider(&self, loader: LoaderType) -> Provider {
        Provider::new(loader, self.provider_context())
    }
}
