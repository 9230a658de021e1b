// ─── Directory listings ───
// Maven repositories serve a plain HTML index per directory. Release
// names are the directory entries of that index.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::core::error::ResolverResult;
use crate::core::http::fetch_text;

/// Fetch a directory index and return the entry names in listing order.
pub async fn fetch_listing(client: &Client, url: &str) -> ResolverResult<Vec<String>> {
    let html = fetch_text(client, url).await?;
    let entries = parse_directory_listing(&html);
    debug!("{} entries in listing {}", entries.len(), url);
    Ok(entries)
}

/// Directory names found in an index page: anchors whose text ends with
/// `/`, minus parent links and platform-native artifacts.
pub fn parse_directory_listing(html: &str) -> Vec<String> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&anchors)
        .filter_map(|anchor| {
            let text: String = anchor.text().collect();
            let name = text.trim().strip_suffix('/')?;
            if name.is_empty() || name.starts_with("..") || name.contains("native") {
                return None;
            }
            Some(name.to_string())
        })
        .collect()
}
