use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported server ecosystems.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    Vanilla,
    Fabric,
    Forge,
    NeoForge,
    Quilt,
}

impl LoaderType {
    pub const ALL: [LoaderType; 5] = [
        LoaderType::Vanilla,
        LoaderType::Fabric,
        LoaderType::Forge,
        LoaderType::NeoForge,
        LoaderType::Quilt,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            LoaderType::Vanilla => "Java edition (vanilla)",
            LoaderType::Fabric => "Modded Java with the Fabric mod loader",
            LoaderType::Forge => "Modded Java with the Forge mod loader",
            LoaderType::NeoForge => "Modded Java with the NeoForge mod loader",
            LoaderType::Quilt => "Modded Java with the Quilt mod loader",
        }
    }

    /// Everything except vanilla loads mods and gets a `mods` volume.
    pub fn is_modded(&self) -> bool {
        !matches!(self, LoaderType::Vanilla)
    }
}

impl fmt::Display for LoaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderType::Vanilla => write!(f, "vanilla"),
            LoaderType::Fabric => write!(f, "fabric"),
            LoaderType::Forge => write!(f, "forge"),
            LoaderType::NeoForge => write!(f, "neoforge"),
            LoaderType::Quilt => write!(f, "quilt"),
        }
    }
}

impl FromStr for LoaderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vanilla" => Ok(LoaderType::Vanilla),
            "fabric" => Ok(LoaderType::Fabric),
            "forge" => Ok(LoaderType::Forge),
            "neoforge" | "neoforged" => Ok(LoaderType::NeoForge),
            "quilt" => Ok(LoaderType::Quilt),
            other => Err(format!(
                "unknown server type {:?} (expected one of: vanilla, fabric, forge, neoforge, quilt)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for loader in LoaderType::ALL {
            assert_eq!(loader.to_string().parse::<LoaderType>(), Ok(loader));
        }
    }

    #[test]
    fn parse_accepts_legacy_neoforged_spelling() {
        assert_eq!("NeoForged".parse::<LoaderType>(), Ok(LoaderType::NeoForge));
        assert!("bedrock".parse::<LoaderType>().is_err());
    }
}
