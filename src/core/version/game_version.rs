// ─── Game Version ───
// A (minecraft, optional loader) pair plus the ordering used to pick
// "latest" across every ecosystem.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::error::{ResolverError, ResolverResult};

const LATEST: &str = "latest";
const ALL: &str = "all";

/// Separator between the Minecraft version and a pinned loader version
/// (`1.20.1:0.15.0`).
pub const LOADER_SEPARATOR: char = ':';

/// A requested game version, optionally pinned to a loader release.
///
/// The strings are kept verbatim: upstream APIs disagree on whether `1.20`
/// and `1.20.0` are the same thing, so lookups always use the original text.
/// Ordering and equality follow the padded numeric comparison instead, which
/// means `1.20 == 1.20.0`.
#[derive(Debug, Clone, Serialize)]
pub struct GameVersion {
    pub minecraft: String,
    pub loader: Option<String>,
}

impl GameVersion {
    pub fn new(minecraft: impl Into<String>) -> Self {
        Self {
            minecraft: minecraft.into(),
            loader: None,
        }
    }

    pub fn with_loader(minecraft: impl Into<String>, loader: impl Into<String>) -> Self {
        Self {
            minecraft: minecraft.into(),
            loader: Some(loader.into()),
        }
    }

    pub fn latest() -> Self {
        Self::new(LATEST)
    }

    pub fn all() -> Self {
        Self::new(ALL)
    }

    /// Parse `<minecraft>[:<loader>]`. An empty loader part counts as absent.
    pub fn parse(raw: &str) -> ResolverResult<Self> {
        let raw = raw.trim();
        let (minecraft, loader) = match raw.split_once(LOADER_SEPARATOR) {
            Some((minecraft, loader)) => (minecraft.trim(), Some(loader.trim())),
            None => (raw, None),
        };

        if minecraft.is_empty() {
            return Err(ResolverError::InvalidGameVersion(format!(
                "the Minecraft version cannot be empty ({:?})",
                raw
            )));
        }

        Ok(Self {
            minecraft: minecraft.to_string(),
            loader: loader.filter(|l| !l.is_empty()).map(str::to_string),
        })
    }

    pub fn is_latest(&self) -> bool {
        self.minecraft == LATEST
    }

    pub fn is_all(&self) -> bool {
        self.minecraft == ALL
    }

    pub fn is_sentinel(&self) -> bool {
        self.is_latest() || self.is_all()
    }

    /// The same Minecraft version with the loader pin dropped.
    pub fn base(&self) -> GameVersion {
        Self::new(self.minecraft.clone())
    }

    /// Minecraft version as a padded `[major, minor, patch]` triple.
    pub fn minecraft_components(&self) -> [u64; 3] {
        version_key(&self.minecraft).parts
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loader {
            Some(loader) => write!(f, "{}{}{}", self.minecraft, LOADER_SEPARATOR, loader),
            None => write!(f, "{}", self.minecraft),
        }
    }
}

impl FromStr for GameVersion {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─── Ordering ───

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct VersionKey {
    latest: bool,
    parts: [u64; 3],
}

fn version_key(raw: &str) -> VersionKey {
    if raw == LATEST {
        return VersionKey {
            latest: true,
            parts: [0; 3],
        };
    }

    let mut parts = [0u64; 3];
    for (slot, component) in parts.iter_mut().zip(raw.split('.')) {
        *slot = leading_number(component);
    }
    VersionKey {
        latest: false,
        parts,
    }
}

/// `"20"` → 20, `"0-beta"` → 0, `"23w32a"` → 23, `"rc"` → 0.
fn leading_number(component: &str) -> u64 {
    let digits: String = component
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Compare two raw version strings with the padded numeric rule.
pub fn compare_versions(lhs: &str, rhs: &str) -> Ordering {
    version_key(lhs).cmp(&version_key(rhs))
}

impl Ord for GameVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.minecraft, &other.minecraft).then_with(|| {
            // an unpinned loader means "whatever is newest"
            compare_versions(
                self.loader.as_deref().unwrap_or(LATEST),
                other.loader.as_deref().unwrap_or(LATEST),
            )
        })
    }
}

impl PartialOrd for GameVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GameVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GameVersion {}
