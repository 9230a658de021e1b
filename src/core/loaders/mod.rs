pub mod availability;
pub mod context;
pub mod descriptor;
pub mod fabric;
pub mod forge;
pub mod listing;
pub mod loader_type;
pub mod neoforge;
pub mod provider;
pub mod quilt;
pub mod vanilla;

pub use context::ProviderContext;
pub use descriptor::{canonical_name, sanitize_tag, RuntimeDescriptor};
pub use loader_type::LoaderType;
pub use provider::{Provider, RuntimeProvider};
pub use vanilla::VanillaProvider;
