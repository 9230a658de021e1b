use std::sync::Arc;

use crate::core::state::UpstreamEndpoints;

use super::vanilla::VanillaProvider;

/// Shared wiring for every provider.
/// Loader providers reuse the vanilla provider for the release list and
/// the Java version of a base game version.
#[derive(Clone)]
pub struct ProviderContext {
    pub http_client: reqwest::Client,
    pub endpoints: UpstreamEndpoints,
    pub max_concurrent_probes: usize,
    pub vanilla: Arc<VanillaProvider>,
}
