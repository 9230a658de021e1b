pub mod game_version;
pub mod manifest;
pub mod version_file;

pub use game_version::{compare_versions, GameVersion, LOADER_SEPARATOR};
pub use manifest::{VersionEntry, VersionManifest, VERSION_MANIFEST_URL};
pub use version_file::{DownloadArtifact, VersionDownloads, VersionJson};
