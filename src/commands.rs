use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::core::build::{self, base_latest_tag, image_labels, image_tag, latest_tag};
use crate::core::downloader::Downloader;
use crate::core::error::{ResolverError, ResolverResult};
use crate::core::loaders::{LoaderType, Provider, RuntimeDescriptor};
use crate::core::state::{AppState, Settings};
use crate::core::version::GameVersion;

#[derive(Parser, Debug)]
#[command(name = "dockercraft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: <config dir>/dockercraft/settings.json)
    #[arg(long, global = true, value_name = "PATH", env = "DOCKERCRAFT_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Server type: vanilla, fabric, forge, neoforge or quilt
    #[arg(short = 't', long = "type", default_value = "vanilla")]
    pub loader: LoaderType,

    /// `<minecraft>[:<loader>]`, `latest` or `all`
    #[arg(short = 'v', long = "version", default_value = "latest")]
    pub version: GameVersion,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the versions a server type can be built for
    List {
        #[arg(short = 't', long = "type", default_value = "vanilla")]
        loader: LoaderType,

        /// One entry per loader build instead of per game version
        #[arg(long)]
        full: bool,
    },

    /// Resolve versions and print their runtime descriptors as JSON
    Resolve {
        #[command(flatten)]
        target: Target,
    },

    /// Render and stage the Docker build context of each version
    Plan {
        #[command(flatten)]
        target: Target,

        /// Directory receiving one build context per version
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Extra Alpine package to install (repeatable)
        #[arg(long = "package", value_name = "PACKAGE")]
        packages: Vec<String>,

        /// Extra Dockerfile instruction appended after the install steps (repeatable)
        #[arg(long = "run", value_name = "INSTRUCTION")]
        run: Vec<String>,
    },

    /// Download the server artifact of each version
    Download {
        #[command(flatten)]
        target: Target,

        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Print the CLI version
    Version,
}

pub async fn dispatch(cli: Cli) -> ResolverResult<()> {
    if let Commands::Version = cli.command {
        println!("dockercraft {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = Settings::load(cli.settings.as_deref())?;
    let state = AppState::new(settings)?;

    match cli.command {
        Commands::List { loader, full } => list_versions(&state, loader, full).await,
        Commands::Resolve { target } => {
            let descriptors = resolve_target(&state, &target).await?;
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
            Ok(())
        }
        Commands::Plan {
            target,
            output,
            packages,
            run,
        } => {
            for descriptor in resolve_target(&state, &target).await? {
                stage_plan(&target, &descriptor, &output, &packages, &run).await?;
            }
            Ok(())
        }
        Commands::Download { target, output } => {
            let downloader = Downloader::new(state.http_client.clone());
            for descriptor in resolve_target(&state, &target).await? {
                let path = downloader.download_artifact(&descriptor, &output).await?;
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

async fn list_versions(state: &AppState, loader: LoaderType, full: bool) -> ResolverResult<()> {
    let provider = state.provider(loader);
    let mut versions = if full {
        provider.enumerate_versions().await?
    } else {
        provider.available_versions().await?
    };
    if versions.is_empty() {
        return Err(ResolverError::NoVersionsFound(loader));
    }

    versions.sort_by(|a, b| b.cmp(a));
    for (i, version) in versions.iter().enumerate() {
        if i == 0 {
            println!("{} (latest)", version);
        } else {
            println!("{}", version);
        }
    }
    Ok(())
}

/// Expand the requested version and resolve every result. A single
/// version must resolve; with `all`, versions that fail are skipped.
async fn resolve_target(
    state: &AppState,
    target: &Target,
) -> ResolverResult<Vec<RuntimeDescriptor>> {
    if !target.loader.is_modded() && target.version.loader.is_some() {
        return Err(ResolverError::InvalidGameVersion(format!(
            "vanilla servers have no mod loader: {}",
            target.version
        )));
    }

    let provider: Provider = state.provider(target.loader);
    let versions = provider.expand(&target.version).await?;

    if let [version] = versions.as_slice() {
        return Ok(vec![provider.resolve(version).await?]);
    }

    let mut descriptors = Vec::with_capacity(versions.len());
    for version in &versions {
        match provider.resolve(version).await {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) => warn!("Skipping {} {}: {}", target.loader, version, e),
        }
    }
    if descriptors.is_empty() {
        return Err(ResolverError::NoVersionsFound(target.loader));
    }
    Ok(descriptors)
}

async fn stage_plan(
    target: &Target,
    descriptor: &RuntimeDescriptor,
    output: &std::path::Path,
    packages: &[String],
    run: &[String],
) -> ResolverResult<()> {
    let plan = build::render(descriptor, packages, run);
    let staged = build::stage_build_plan(&plan, &output.join(descriptor.canonical_name())).await?;

    let mut tags = vec![image_tag(descriptor)];
    if target.version.is_latest() {
        tags.push(latest_tag(descriptor.loader_type()));
    } else if descriptor.loader_type().is_modded() && target.version.loader.is_none() {
        tags.push(base_latest_tag(
            descriptor.loader_type(),
            &descriptor.version().minecraft,
        ));
    }

    info!("Tags for {}: {}", staged.directory.display(), tags.join(", "));
    for (name, value) in image_labels(descriptor) {
        info!("  label {}={}", name, value);
    }
    println!("{}", staged.directory.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_arguments_parse() {
        let cli = Cli::try_parse_from([
            "dockercraft",
            "plan",
            "-t",
            "fabric",
            "-v",
            "1.20.1:0.15.10",
            "-o",
            "out",
            "--package",
            "curl",
            "--package",
            "git",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan {
                target,
                output,
                packages,
                run,
            } => {
                assert_eq!(target.loader, LoaderType::Fabric);
                assert_eq!(target.version.minecraft, "1.20.1");
                assert_eq!(target.version.loader.as_deref(), Some("0.15.10"));
                assert_eq!(output, PathBuf::from("out"));
                assert_eq!(packages, ["curl", "git"]);
                assert!(run.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn defaults_to_latest_vanilla() {
        let cli = Cli::try_parse_from(["dockercraft", "resolve"]).unwrap();
        let Commands::Resolve { target } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(target.loader, LoaderType::Vanilla);
        assert!(target.version.is_latest());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Cli::try_parse_from(["dockercraft", "list", "-t", "bukkit"]).is_err());
    }
}
