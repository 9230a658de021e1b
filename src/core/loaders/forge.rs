use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::availability::probe_versions;
use super::context::ProviderContext;
use super::descriptor::{run_installer, RuntimeDescriptor};
use super::loader_type::LoaderType;
use super::provider::{ensure_resolvable, RuntimeProvider};
use super::vanilla::VanillaProvider;
use crate::core::error::{ResolverError, ResolverResult};
use crate::core::http::{fetch_text, join_url};
use crate::core::version::GameVersion;

const EXECUTABLE: &str = "forge_installer.jar";
const INSTALL_ARGS: &str = "--installServer /minecraft";
const START_COMMAND: &str = r#"if [[ -e "run.sh" ]]; then
    bash run.sh --nogui $@
else
    java $(cat user_jvm_args.txt) -jar forge*.jar --nogui $@
fi"#;

/// Forge wraps some download links in ad redirects.
const AD_DOMAINS: [&str; 1] = ["adfoc.us"];
const INSTALLER_SUFFIX: &str = "-installer.jar";

/// One usable row of a Forge downloads page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeBuild {
    pub version: String,
    pub is_latest: bool,
    pub is_recommended: bool,
    pub installer_url: String,
}

struct ForgeSelectors {
    rows: Selector,
    version: Selector,
    latest: Selector,
    recommended: Selector,
    links: Selector,
}

impl ForgeSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            rows: Selector::parse("table.download-list tbody tr").ok()?,
            version: Selector::parse("td.download-version").ok()?,
            latest: Selector::parse("i.promo-latest").ok()?,
            recommended: Selector::parse("i.promo-recommended").ok()?,
            links: Selector::parse("a[href]").ok()?,
        })
    }

    fn build(&self, row: ElementRef<'_>) -> Option<ForgeBuild> {
        let version = row
            .select(&self.version)
            .next()?
            .text()
            .collect::<String>()
            .split_whitespace()
            .next()?
            .to_string();

        let installer_url = row
            .select(&self.links)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| {
                !AD_DOMAINS.iter().any(|domain| href.contains(domain))
                    && href.ends_with(INSTALLER_SUFFIX)
            })?;
        if reqwest::Url::parse(installer_url).is_err() {
            debug!("Skipping Forge {}: bad installer link {}", version, installer_url);
            return None;
        }

        Some(ForgeBuild {
            is_latest: row.select(&self.latest).next().is_some(),
            is_recommended: row.select(&self.recommended).next().is_some(),
            installer_url: installer_url.to_string(),
            version,
        })
    }
}

/// Every row of the downloads table that has a version and a direct
/// installer link, in page order.
pub fn parse_forge_builds(html: &str) -> Vec<ForgeBuild> {
    let Some(selectors) = ForgeSelectors::new() else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&selectors.rows)
        .filter_map(|row| selectors.build(row))
        .collect()
}

/// Pinned: that exact version. Otherwise the first `promo-latest` build,
/// falling back to the first `promo-recommended` one.
pub fn select_build<'a>(builds: &'a [ForgeBuild], pinned: Option<&str>) -> Option<&'a ForgeBuild> {
    match pinned {
        Some(pinned) => builds.iter().find(|b| b.version == pinned),
        None => builds
            .iter()
            .find(|b| b.is_latest)
            .or_else(|| builds.iter().find(|b| b.is_recommended)),
    }
}

pub struct ForgeProvider {
    client: reqwest::Client,
    files_url: String,
    concurrency: usize,
    vanilla: Arc<VanillaProvider>,
}

impl ForgeProvider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self {
            client: ctx.http_client,
            files_url: ctx.endpoints.forge_files,
            concurrency: ctx.max_concurrent_probes,
            vanilla: ctx.vanilla,
        }
    }

    fn page_url(&self, minecraft: &str) -> String {
        join_url(&self.files_url, &format!("index_{}.html", minecraft))
    }

    async fn builds(&self, minecraft: &str) -> ResolverResult<Vec<ForgeBuild>> {
        let html = fetch_text(&self.client, &self.page_url(minecraft)).await?;
        let builds = parse_forge_builds(&html);
        if builds.is_empty() {
            return Err(ResolverError::VersionNotFound(format!(
                "no Forge build for Minecraft {}",
                minecraft
            )));
        }
        Ok(builds)
    }

    async fn probe_releases(&self) -> ResolverResult<Vec<(GameVersion, Vec<ForgeBuild>)>> {
        let releases = self.vanilla.release_versions().await?;
        Ok(probe_versions(releases, self.concurrency, |v| async move {
            self.builds(&v.minecraft).await
        })
        .await)
    }
}

#[async_trait]
impl RuntimeProvider for ForgeProvider {
    fn loader_type(&self) -> LoaderType {
        LoaderType::Forge
    }

    /// Only bases with a `promo-latest` or `promo-recommended` build;
    /// unmarked builds are reachable through a pin.
    async fn available_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        Ok(self
            .probe_releases()
            .await?
            .into_iter()
            .filter_map(|(version, builds)| {
                if select_build(&builds, None).is_some() {
                    Some(version)
                } else {
                    debug!("Skipping Forge {}: no promoted build", version.minecraft);
                    None
                }
            })
            .collect())
    }

    async fn enumerate_versions(&self) -> ResolverResult<Vec<GameVersion>> {
        Ok(self
            .probe_releases()
            .await?
            .into_iter()
            .flat_map(|(base, builds)| {
                builds.into_iter().map(move |build| {
                    GameVersion::with_loader(base.minecraft.clone(), build.version)
                })
            })
            .collect())
    }

    async fn resolve(&self, version: &GameVersion) -> ResolverResult<RuntimeDescriptor> {
        ensure_resolvable(LoaderType::Forge, version)?;
        let minecraft = version.minecraft.as_str();

        let java = self.vanilla.version_info(minecraft).await?.required_java_major();
        let builds = self.builds(minecraft).await?;
        let build = select_build(&builds, version.loader.as_deref()).ok_or_else(|| {
            ResolverError::VersionNotFound(match &version.loader {
                Some(pinned) => format!("Forge {} for Minecraft {}", pinned, minecraft),
                None => format!("no latest or recommended Forge for Minecraft {}", minecraft),
            })
        })?;

        info!("Resolved Forge {} -> {}", minecraft, build.version);

        Ok(RuntimeDescriptor::new(
            LoaderType::Forge,
            GameVersion::with_loader(minecraft, build.version.clone()),
            build.installer_url.clone(),
            EXECUTABLE,
            run_installer(&build.installer_url, EXECUTABLE, INSTALL_ARGS),
            START_COMMAND.to_string(),
            Some(java),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(version: &str, markers: &str, links: &str) -> String {
        format!(
            r#"<tr>
                <td class="download-version">{version}{markers}</td>
                <td class="download-time">2023-07-07</td>
                <td class="download-files"><ul class="download-links">{links}</ul></td>
            </tr>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body><table class="download-list"><tbody>{}</tbody></table></body></html>"#,
            rows.join("\n")
        )
    }

    fn installer(version: &str) -> String {
        format!(
            r#"<li><a href="https://adfoc.us/serve/?url=https://maven/forge-{v}-installer.jar">Installer</a>
               <a class="info-link" href="https://maven/forge-{v}-installer.jar">i</a></li>
               <li><a href="https://maven/forge-{v}-mdk.zip">Mdk</a></li>"#,
            v = version
        )
    }

    const LATEST: &str = r#"<i class="promo-latest fa"></i>"#;
    const RECOMMENDED: &str = r#"<i class="promo-recommended fa"></i>"#;

    #[test]
    fn ad_links_are_skipped() {
        let builds = parse_forge_builds(&page(&[row("47.1.44", LATEST, &installer("47.1.44"))]));

        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].version, "47.1.44");
        assert!(builds[0].is_latest);
        assert_eq!(
            builds[0].installer_url,
            "https://maven/forge-47.1.44-installer.jar"
        );
    }

    #[test]
    fn rows_without_a_direct_installer_do_not_abort_the_scan() {
        let ad_only =
            r#"<li><a href="https://adfoc.us/serve/?url=https://maven/forge-47.1.43-installer.jar">Installer</a></li>"#;
        let builds = parse_forge_builds(&page(&[
            row("47.1.43", LATEST, ad_only),
            row("47.1.42", "", r#"<li><a href="not a url-installer.jar">x</a></li>"#),
            row("", "", &installer("0.0.0")),
            row("47.1.41", RECOMMENDED, &installer("47.1.41")),
        ]));

        let versions: Vec<_> = builds.iter().map(|b| b.version.as_str()).collect();
        assert_eq!(versions, ["47.1.41"]);
    }

    #[test]
    fn latest_wins_over_recommended() {
        let builds = parse_forge_builds(&page(&[
            row("47.1.44", "", &installer("47.1.44")),
            row("47.1.43", RECOMMENDED, &installer("47.1.43")),
            row("47.1.42", LATEST, &installer("47.1.42")),
        ]));

        assert_eq!(select_build(&builds, None).unwrap().version, "47.1.42");
    }

    #[test]
    fn recommended_is_the_fallback() {
        let builds = parse_forge_builds(&page(&[
            row("36.2.39", "", &installer("36.2.39")),
            row("36.2.34", RECOMMENDED, &installer("36.2.34")),
        ]));

        assert_eq!(select_build(&builds, None).unwrap().version, "36.2.34");
    }

    #[test]
    fn unmarked_builds_need_a_pin() {
        let builds = parse_forge_builds(&page(&[row("14.23.5", "", &installer("14.23.5"))]));

        assert!(select_build(&builds, None).is_none());
        assert_eq!(
            select_build(&builds, Some("14.23.5")).unwrap().version,
            "14.23.5"
        );
        assert!(select_build(&builds, Some("14.23")).is_none());
    }

    #[test]
    fn unrelated_documents_yield_no_builds() {
        assert!(parse_forge_builds("<html><body><p>nope</p></body></html>").is_empty());
    }
}
