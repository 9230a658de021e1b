use std::collections::BTreeSet;

use serde::Serialize;

use super::loader_type::LoaderType;
use crate::core::build::defaults::{HOME_DIRECTORY, MODS_VOLUME};
use crate::core::version::GameVersion;

/// Longest tag the registry grammar accepts.
const MAX_TAG_LEN: usize = 128;

/// Unified result of resolving a version in any ecosystem.
///
/// Everything the build plan needs lives here: where the artifact comes
/// from, how to install it, how to start it and which Java to run it with.
/// Descriptors are built by the providers and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeDescriptor {
    loader_type: LoaderType,
    version: GameVersion,
    download_url: String,
    canonical_name: String,
    executable_name: String,
    install_steps: Vec<String>,
    start_command: String,
    extra_volumes: BTreeSet<String>,
    recommended_java: Option<u32>,
}

impl RuntimeDescriptor {
    /// `version` must carry the resolved loader version (if any); the
    /// canonical name is derived from it.
    pub(crate) fn new(
        loader_type: LoaderType,
        version: GameVersion,
        download_url: String,
        executable_name: &str,
        install_steps: Vec<String>,
        start_command: String,
        recommended_java: Option<u32>,
    ) -> Self {
        let extra_volumes = if loader_type.is_modded() {
            BTreeSet::from([MODS_VOLUME.to_string()])
        } else {
            BTreeSet::new()
        };

        Self {
            canonical_name: canonical_name(loader_type, &version),
            loader_type,
            version,
            download_url,
            executable_name: executable_name.to_string(),
            install_steps,
            start_command,
            extra_volumes,
            recommended_java,
        }
    }

    pub fn loader_type(&self) -> LoaderType {
        self.loader_type
    }

    pub fn version(&self) -> &GameVersion {
        &self.version
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Unique per (ecosystem, version); safe to use as an image tag.
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    pub fn install_steps(&self) -> &[String] {
        &self.install_steps
    }

    pub fn start_command(&self) -> &str {
        &self.start_command
    }

    /// Volumes beyond the defaults every server gets.
    pub fn extra_volumes(&self) -> &BTreeSet<String> {
        &self.extra_volumes
    }

    pub fn recommended_java(&self) -> Option<u32> {
        self.recommended_java
    }
}

/// `<minecraft>` for vanilla, `<minecraft>-<type>_<loader>` otherwise.
pub fn canonical_name(loader_type: LoaderType, version: &GameVersion) -> String {
    let raw = match (&version.loader, loader_type.is_modded()) {
        (Some(loader), true) => format!("{}-{}_{}", version.minecraft, loader_type, loader),
        _ => version.minecraft.clone(),
    };
    sanitize_tag(&raw)
}

/// Force a string into the image tag grammar: lowercase alphanumerics,
/// `.`, `-` and `_`; no leading `.` or `-`; at most 128 characters.
///
/// Build metadata (`+`) becomes `--` so `0.15.1+build` and `0.15.1_build`
/// stay apart. Any other illegal character becomes `_`, and names are cut
/// at 128 characters, so those two cases can still collide.
pub fn sanitize_tag(raw: &str) -> String {
    let mut tag = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '.' | '-' | '_') => tag.push(c),
            '+' => tag.push_str("--"),
            _ => tag.push('_'),
        }
    }

    if tag.starts_with(['.', '-']) {
        tag.insert(0, '_');
    }
    tag.truncate(MAX_TAG_LEN);
    tag
}

// ─── Install step helpers ───

/// `ADD "<url>" /minecraft/<executable>`
pub(crate) fn add_to_home(url: &str, executable: &str) -> String {
    format!("ADD \"{}\" {}/{}", url, HOME_DIRECTORY, executable)
}

/// Download an installer into `/tmp`, run it against the server
/// directory and clean up after it.
pub(crate) fn run_installer(url: &str, executable: &str, install_args: &str) -> Vec<String> {
    vec![
        "WORKDIR /tmp".to_string(),
        format!("ADD \"{}\" ./{}", url, executable),
        format!("RUN java -jar {} {}", executable, install_args),
        format!("WORKDIR {}", HOME_DIRECTORY),
        "RUN rm -rf /tmp".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_name_is_the_minecraft_version() {
        let name = canonical_name(LoaderType::Vanilla, &GameVersion::new("1.20.1"));
        assert_eq!(name, "1.20.1");
    }

    #[test]
    fn loader_name_includes_type_and_loader() {
        let name = canonical_name(
            LoaderType::Fabric,
            &GameVersion::with_loader("1.20.1", "0.15.0"),
        );
        assert_eq!(name, "1.20.1-fabric_0.15.0");

        let name = canonical_name(
            LoaderType::NeoForge,
            &GameVersion::with_loader("1.21", "21.0.0-beta"),
        );
        assert_eq!(name, "1.21-neoforge_21.0.0-beta");
    }

    #[test]
    fn sanitize_replaces_illegal_characters() {
        assert_eq!(sanitize_tag("1.20.1-Fabric_0.15.1 build"), "1.20.1-fabric_0.15.1_build");
        assert_eq!(sanitize_tag("-rc"), "_-rc");
        assert_eq!(sanitize_tag(&"a".repeat(200)).len(), 128);
    }

    #[test]
    fn build_metadata_does_not_collide_with_underscores() {
        let plus = canonical_name(
            LoaderType::Fabric,
            &GameVersion::with_loader("1.20.1", "0.15.1+build"),
        );
        let underscore = canonical_name(
            LoaderType::Fabric,
            &GameVersion::with_loader("1.20.1", "0.15.1_build"),
        );
        assert_eq!(plus, "1.20.1-fabric_0.15.1--build");
        assert_eq!(underscore, "1.20.1-fabric_0.15.1_build");
    }

    #[test]
    fn modded_descriptors_get_a_mods_volume() {
        let descriptor = RuntimeDescriptor::new(
            LoaderType::Forge,
            GameVersion::with_loader("1.20.1", "47.1.0"),
            "https://example/forge-installer.jar".into(),
            "forge_installer.jar",
            vec![],
            "bash run.sh".into(),
            Some(17),
        );
        assert!(descriptor.extra_volumes().contains("mods"));
        assert_eq!(descriptor.canonical_name(), "1.20.1-forge_47.1.0");
    }
}
