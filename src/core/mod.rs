// ─── dockercraft core ───
// Resolves Minecraft server runtimes and renders container build plans.
//
// Architecture:
//   core/
//     version/     Mojang manifest, version metadata, version ordering
//     loaders/     Vanilla, Fabric, Forge, NeoForge, Quilt providers
//     build/       Dockerfile + startup script rendering, tags, staging
//     downloader/  Streaming artifact downloads
//     java/        Java version → Alpine package mapping
//     state/       Settings + shared provider wiring

pub mod build;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod loaders;
pub mod state;
pub mod version;
