// ─── Image tags & labels ───

use std::collections::BTreeMap;

use crate::core::loaders::{sanitize_tag, LoaderType, RuntimeDescriptor};

const LATEST: &str = "latest";

pub const LABEL_TYPE: &str = "minecraft.server.type";
pub const LABEL_VERSION: &str = "minecraft.server.version";
pub const LABEL_IS_MODDED: &str = "minecraft.server.isModded";
pub const LABEL_LOADER_VERSION: &str = "minecraft.server.modLoader.version";

/// Tag of the image built from `descriptor`.
pub fn image_tag(descriptor: &RuntimeDescriptor) -> String {
    descriptor.canonical_name().to_string()
}

/// `latest` for vanilla, `<type>_latest` for loader ecosystems.
pub fn latest_tag(loader: LoaderType) -> String {
    if loader.is_modded() {
        format!("{}_{}", loader, LATEST)
    } else {
        LATEST.to_string()
    }
}

/// Tag of the newest loader build for one base version
/// (`1.20.1-fabric_latest`). Vanilla has no loader, so this is `latest`.
pub fn base_latest_tag(loader: LoaderType, minecraft: &str) -> String {
    if loader.is_modded() {
        sanitize_tag(&format!("{}-{}", minecraft, latest_tag(loader)))
    } else {
        latest_tag(loader)
    }
}

pub fn image_labels(descriptor: &RuntimeDescriptor) -> BTreeMap<String, String> {
    let version = descriptor.version();
    let mut labels = BTreeMap::from([
        (LABEL_TYPE.to_string(), descriptor.loader_type().to_string()),
        (LABEL_VERSION.to_string(), version.minecraft.clone()),
    ]);

    if let Some(loader) = &version.loader {
        labels.insert(LABEL_IS_MODDED.to_string(), "true".to_string());
        labels.insert(LABEL_LOADER_VERSION.to_string(), loader.clone());
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::GameVersion;

    fn descriptor(loader: LoaderType, version: GameVersion) -> RuntimeDescriptor {
        RuntimeDescriptor::new(
            loader,
            version,
            "https://example/server.jar".to_string(),
            "server.jar",
            Vec::new(),
            "true".to_string(),
            Some(17),
        )
    }

    #[test]
    fn latest_tags() {
        assert_eq!(latest_tag(LoaderType::Vanilla), "latest");
        assert_eq!(latest_tag(LoaderType::NeoForge), "neoforge_latest");
        assert_eq!(base_latest_tag(LoaderType::Fabric, "1.20.1"), "1.20.1-fabric_latest");
        assert_eq!(base_latest_tag(LoaderType::Vanilla, "1.20.1"), "latest");
    }

    #[test]
    fn image_tag_is_the_canonical_name() {
        let fabric = descriptor(
            LoaderType::Fabric,
            GameVersion::with_loader("1.20.1", "0.15.10"),
        );
        assert_eq!(image_tag(&fabric), "1.20.1-fabric_0.15.10");
    }

    #[test]
    fn labels_mark_modded_servers() {
        let vanilla = image_labels(&descriptor(LoaderType::Vanilla, GameVersion::new("1.20.1")));
        assert_eq!(vanilla.len(), 2);
        assert_eq!(vanilla[LABEL_TYPE], "vanilla");
        assert_eq!(vanilla[LABEL_VERSION], "1.20.1");

        let quilt = image_labels(&descriptor(
            LoaderType::Quilt,
            GameVersion::with_loader("1.20.1", "0.9.2"),
        ));
        assert_eq!(quilt[LABEL_TYPE], "quilt");
        assert_eq!(quilt[LABEL_IS_MODDED], "true");
        assert_eq!(quilt[LABEL_LOADER_VERSION], "0.9.2");
    }
}
