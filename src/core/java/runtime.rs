// ─── Java Runtime ───
// Maps Java major versions to the Alpine packages installed in the image.

/// Java used by releases whose metadata predates the `javaVersion` field.
pub const LEGACY_JAVA_MAJOR: u32 = 8;

/// Used when neither the metadata nor the version heuristic gives an answer.
pub const LATEST_JAVA_MAJOR: u32 = 17;

/// Alpine package providing a headless JRE for `major`.
pub fn java_package_name(major: u32) -> String {
    match major {
        // the legacy builds have no headless split
        7 | 8 => format!("openjdk{}-jre", major),
        _ => format!("openjdk{}-jre-headless", major),
    }
}

/// Best-effort Java requirement derived from the version string alone.
///
/// Only used when a runtime descriptor carries no recommendation from
/// upstream metadata.
pub fn required_java_for_minecraft_version(minecraft_version: &str) -> u32 {
    let lower = minecraft_version.to_ascii_lowercase();
    if let Some(week_pos) = lower.find('w') {
        let year_hint = &lower[..week_pos];
        let year_suffix = year_hint
            .len()
            .checked_sub(2)
            .and_then(|start| year_hint.get(start..));
        if let Some(Ok(snapshot_year)) = year_suffix.map(str::parse::<u32>) {
            if snapshot_year >= 24 {
                return 21;
            }
            return 17;
        }
    }

    let mut parts = minecraft_version.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    let minor = parts.next().and_then(|p| p.parse::<u32>().ok());
    let patch = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);

    let Some(minor) = minor else {
        return LATEST_JAVA_MAJOR;
    };

    if major > 1 || minor >= 21 || (minor == 20 && patch >= 5) {
        21
    } else if minor >= 17 {
        17
    } else {
        LEGACY_JAVA_MAJOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_names_follow_alpine_naming() {
        assert_eq!(java_package_name(8), "openjdk8-jre");
        assert_eq!(java_package_name(17), "openjdk17-jre-headless");
        assert_eq!(java_package_name(21), "openjdk21-jre-headless");
    }

    #[test]
    fn heuristic_matches_known_boundaries() {
        assert_eq!(required_java_for_minecraft_version("1.12.2"), 8);
        assert_eq!(required_java_for_minecraft_version("1.17"), 17);
        assert_eq!(required_java_for_minecraft_version("1.20.4"), 17);
        assert_eq!(required_java_for_minecraft_version("1.20.5"), 21);
        assert_eq!(required_java_for_minecraft_version("1.21"), 21);
        assert_eq!(required_java_for_minecraft_version("23w32a"), 17);
        assert_eq!(required_java_for_minecraft_version("24w14a"), 21);
    }

    #[test]
    fn unparsable_version_falls_back_to_latest() {
        assert_eq!(required_java_for_minecraft_version("weird"), LATEST_JAVA_MAJOR);
    }

    #[test]
    fn non_ascii_before_the_week_marker_does_not_panic() {
        assert_eq!(required_java_for_minecraft_version("é1w5a"), LATEST_JAVA_MAJOR);
        assert_eq!(required_java_for_minecraft_version("2é4w"), LATEST_JAVA_MAJOR);
    }
}
