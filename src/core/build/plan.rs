use serde::Serialize;
use tracing::warn;

use super::defaults::{
    property_env_key, startup_script_path, BASE_IMAGE, CONFIGURATIONS_DIRECTORY, CONFIG_FILES,
    DEFAULT_VOLUMES, HOME_DIRECTORY, LEGACY_CONFIG_FILES, SERVER_PORT, SERVER_PROPERTIES,
    STARTUP_SCRIPT_NAME,
};
use crate::core::java::{java_package_name, required_java_for_minecraft_version};
use crate::core::loaders::RuntimeDescriptor;

const README: &str = "\
# Minecraft server configuration files

Text files (.txt) are for legacy versions (prior to 1.8); newer versions use the JSON files.
If your server runs Minecraft 1.8 or newer you can delete the .txt files.

Custom JVM arguments go in jvm_args.txt. Add `-XX:+PrintFlagsFinal` at the top of it to
print every JVM option before the server starts.";

/// The two files a server image is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub dockerfile: String,
    pub startup_script: String,
}

/// Render the Dockerfile and startup script for a resolved runtime.
/// Same inputs, same bytes.
pub fn render(
    descriptor: &RuntimeDescriptor,
    extra_system_packages: &[String],
    extra_install_commands: &[String],
) -> BuildPlan {
    BuildPlan {
        dockerfile: render_dockerfile(descriptor, extra_system_packages, extra_install_commands),
        startup_script: render_startup_script(descriptor.start_command()),
    }
}

fn java_major(descriptor: &RuntimeDescriptor) -> u32 {
    match descriptor.recommended_java() {
        Some(major) => major,
        None => {
            let major = required_java_for_minecraft_version(&descriptor.version().minecraft);
            warn!(
                "No recommended Java for {}, guessing Java {}",
                descriptor.canonical_name(),
                major
            );
            major
        }
    }
}

fn render_dockerfile(
    descriptor: &RuntimeDescriptor,
    extra_system_packages: &[String],
    extra_install_commands: &[String],
) -> String {
    let mut packages = vec!["bash".to_string(), java_package_name(java_major(descriptor))];
    packages.extend(extra_system_packages.iter().cloned());

    let volumes = DEFAULT_VOLUMES
        .iter()
        .copied()
        .chain(descriptor.extra_volumes().iter().map(String::as_str))
        .map(|v| format!("\"{}/{}\"", HOME_DIRECTORY, v))
        .collect::<Vec<_>>()
        .join(", ");

    let install = descriptor
        .install_steps()
        .iter()
        .chain(extra_install_commands)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");

    let script = startup_script_path();

    [
        format!("FROM {}", BASE_IMAGE),
        String::new(),
        "# Runtime (java) and system packages".to_string(),
        format!(
            "RUN apk update \\\n    && apk add {} \\\n    && mkdir -p {}",
            packages.join(" "),
            CONFIGURATIONS_DIRECTORY
        ),
        String::new(),
        format!("# Install {}", descriptor.canonical_name()),
        install,
        String::new(),
        format!("COPY --chmod=755 {} {}", STARTUP_SCRIPT_NAME, script),
        String::new(),
        format!("WORKDIR {}", HOME_DIRECTORY),
        format!("EXPOSE {}/tcp", SERVER_PORT),
        format!("EXPOSE {}/udp", SERVER_PORT),
        format!("VOLUME [ {} ]", volumes),
        format!("ENTRYPOINT [ \"{}\" ]", script),
        String::new(),
    ]
    .join("\n")
}

fn render_startup_script(start_command: &str) -> String {
    let properties = SERVER_PROPERTIES
        .iter()
        .map(|p| format!("    \"{}={}\"", property_env_key(p), p))
        .collect::<Vec<_>>()
        .join("\n");
    let quoted = |files: &[&str]| {
        files
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let config = CONFIGURATIONS_DIRECTORY;
    let home = HOME_DIRECTORY;

    format!(
        r#"#!/bin/bash
# Entry point of the Minecraft server container

java -version

cd {home}

echo "eula=$EULA" > eula.txt

# server.properties is rebuilt from environment overrides (ENV_NAME=property-name)
PROPERTIES=(
{properties}
)
echo '' > server.properties
for entry in "${{PROPERTIES[@]}}"; do
    key="${{entry%%=*}}"
    name="${{entry#*=}}"
    if [[ -n "${{!key}}" ]]; then
        echo "$name=${{!key}}" >> server.properties
    fi
done

# Persistent configuration files live in {config}
mkdir -p "{config}"
LEGACY_CONFIG_FILES=( {legacy} )
CONFIG_FILES=( {current} )
for file_name in "${{LEGACY_CONFIG_FILES[@]}}"; do
    touch "{config}/$file_name"
    ln -sf "{config}/$file_name" "{home}/$file_name"
done
for file_name in "${{CONFIG_FILES[@]}}"; do
    if [[ ! -e "{config}/$file_name" ]]; then
        echo "[]" > "{config}/$file_name"
    fi
    ln -sf "{config}/$file_name" "{home}/$file_name"
done

touch "{config}/jvm_args.txt"
ln -sf "{config}/jvm_args.txt" "{home}/user_jvm_args.txt"

cat > "{config}/README.txt" <<'README'
{readme}
README

echo -e '\nServer properties:'
cat server.properties

echo -e "Starting server...\nCustom args: $@\n"
{start_command}
"#,
        legacy = quoted(&LEGACY_CONFIG_FILES[..]),
        current = quoted(&CONFIG_FILES[..]),
        readme = README,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::descriptor::{add_to_home, run_installer};
    use crate::core::loaders::LoaderType;
    use crate::core::version::GameVersion;

    fn vanilla() -> RuntimeDescriptor {
        let url = "https://example/server.jar";
        RuntimeDescriptor::new(
            LoaderType::Vanilla,
            GameVersion::new("1.20.1"),
            url.to_string(),
            "server.jar",
            vec![add_to_home(url, "server.jar")],
            "java $(cat user_jvm_args.txt) -jar server.jar $@".to_string(),
            Some(17),
        )
    }

    #[test]
    fn rendering_is_deterministic() {
        let descriptor = vanilla();
        let packages = vec!["curl".to_string()];
        let first = render(&descriptor, &packages, &[]);
        let second = render(&descriptor, &packages, &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn dockerfile_layout() {
        let plan = render(&vanilla(), &["curl".to_string()], &["RUN echo hi".to_string()]);
        let dockerfile = &plan.dockerfile;

        assert!(dockerfile.starts_with("FROM alpine:3.22.2\n"));
        assert!(dockerfile.contains("apk add bash openjdk17-jre-headless curl"));
        assert!(dockerfile
            .contains("ADD \"https://example/server.jar\" /minecraft/server.jar\nRUN echo hi"));
        assert!(dockerfile.contains(
            "COPY --chmod=755 start_server.bash /minecraft/start_server.bash"
        ));
        assert!(dockerfile.contains("EXPOSE 25565/tcp\nEXPOSE 25565/udp"));
        assert!(dockerfile.contains(r#"VOLUME [ "/minecraft/world", "/minecraft/configurations" ]"#));
        assert!(dockerfile.contains(r#"ENTRYPOINT [ "/minecraft/start_server.bash" ]"#));
    }

    #[test]
    fn modded_images_mount_mods() {
        let url = "https://maven/forge-47.1.0-installer.jar";
        let forge = RuntimeDescriptor::new(
            LoaderType::Forge,
            GameVersion::with_loader("1.20.1", "47.1.0"),
            url.to_string(),
            "forge_installer.jar",
            run_installer(url, "forge_installer.jar", "--installServer /minecraft"),
            "bash run.sh --nogui $@".to_string(),
            None,
        );
        let plan = render(&forge, &[], &[]);

        assert!(plan.dockerfile.contains(r#""/minecraft/configurations", "/minecraft/mods" ]"#));
        assert!(plan
            .dockerfile
            .contains("RUN java -jar forge_installer.jar --installServer /minecraft"));
        // No recommendation: 1.20.1 falls back to the heuristic.
        assert!(plan.dockerfile.contains("openjdk17-jre-headless"));
    }

    #[test]
    fn startup_script_covers_the_server_lifecycle() {
        let script = render(&vanilla(), &[], &[]).startup_script;

        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains(r#"echo "eula=$EULA" > eula.txt"#));
        assert!(script.contains(r#""MAX_PLAYERS=max-players""#));
        assert!(script.contains(r#""WHITE_LIST=white-list""#));
        assert!(script.contains(r#"LEGACY_CONFIG_FILES=( "white-list.txt" "ops.txt" "banned-players.txt" )"#));
        assert!(script.contains(r#"echo "[]" > "/minecraft/configurations/$file_name""#));
        assert!(script.contains(r#"ln -sf "/minecraft/configurations/jvm_args.txt" "/minecraft/user_jvm_args.txt""#));
        assert!(script.trim_end().ends_with("java $(cat user_jvm_args.txt) -jar server.jar $@"));
    }
}
