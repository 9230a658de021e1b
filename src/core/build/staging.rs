use std::path::{Path, PathBuf};

use tracing::info;

use super::defaults::{DOCKERFILE_NAME, STARTUP_SCRIPT_NAME};
use super::plan::BuildPlan;
use crate::core::error::{ResolverError, ResolverResult};

/// Paths of a build context written to disk.
#[derive(Debug, Clone)]
pub struct StagedBuild {
    pub directory: PathBuf,
    pub dockerfile: PathBuf,
    pub startup_script: PathBuf,
}

/// Write `plan` into `directory` (created if missing) as a ready-to-build
/// Docker context. Existing files are overwritten.
pub async fn stage_build_plan(plan: &BuildPlan, directory: &Path) -> ResolverResult<StagedBuild> {
    tokio::fs::create_dir_all(directory)
        .await
        .map_err(|e| ResolverError::Io {
            path: directory.to_path_buf(),
            source: e,
        })?;

    let dockerfile = directory.join(DOCKERFILE_NAME);
    write_file(&dockerfile, &plan.dockerfile).await?;

    let startup_script = directory.join(STARTUP_SCRIPT_NAME);
    write_file(&startup_script, &plan.startup_script).await?;
    make_executable(&startup_script).await?;

    info!("Staged build context in {}", directory.display());

    Ok(StagedBuild {
        directory: directory.to_path_buf(),
        dockerfile,
        startup_script,
    })
}

async fn write_file(path: &Path, contents: &str) -> ResolverResult<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ResolverError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> ResolverResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| ResolverError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> ResolverResult<()> {
    Ok(())
}
