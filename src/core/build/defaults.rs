//! Fixed layout of the server image.

/// Base image every server is built from.
pub const BASE_IMAGE: &str = "alpine:3.22.2";

pub const HOME_DIRECTORY: &str = "/minecraft";

pub const CONFIGURATIONS_DIRECTORY: &str = "/minecraft/configurations";

pub const DOCKERFILE_NAME: &str = "Dockerfile";

pub const STARTUP_SCRIPT_NAME: &str = "start_server.bash";

pub const SERVER_PORT: u16 = 25565;

/// Volumes mounted for every ecosystem, relative to [`HOME_DIRECTORY`].
pub const DEFAULT_VOLUMES: [&str; 2] = ["world", "configurations"];

/// Extra volume for ecosystems that load mods.
pub const MODS_VOLUME: &str = "mods";

/// Pre-1.8 persistent configuration files.
pub const LEGACY_CONFIG_FILES: [&str; 3] = ["white-list.txt", "ops.txt", "banned-players.txt"];

/// Current persistent configuration files, seeded with `[]`.
pub const CONFIG_FILES: [&str; 3] = ["whitelist.json", "ops.json", "banned-players.json"];

/// `server.properties` keys that can be overridden from the environment.
pub const SERVER_PROPERTIES: [&str; 31] = [
    "allow-flight",
    "allow-nether",
    "difficulty",
    "enable-command-block",
    "enable-status",
    "enable-query",
    "enforce-secure-profile",
    "gamemode",
    "generate-structures",
    "hardcore",
    "hide-online-players",
    "level-seed",
    "level-type",
    "max-players",
    "max-tick-time",
    "max-world-size",
    "motd",
    "online-mode",
    "op-permission-level",
    "player-idle-timeout",
    "pvp",
    "resource-pack",
    "resource-pack-prompt",
    "require-resource-pack",
    "simulation-distance",
    "spawn-animals",
    "spawn-monsters",
    "spawn-npcs",
    "spawn-protection",
    "view-distance",
    "white-list",
];

/// `max-players` → `MAX_PLAYERS`, `a.b` → `A_B`.
pub fn property_env_key(property: &str) -> String {
    property.to_ascii_uppercase().replace(['-', '.'], "_")
}

/// Absolute path of the startup script inside the image.
pub fn startup_script_path() -> String {
    format!("{}/{}", HOME_DIRECTORY, STARTUP_SCRIPT_NAME)
}
