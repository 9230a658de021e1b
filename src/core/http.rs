use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::{ResolverError, ResolverResult};

pub const APP_USER_AGENT: &str = "dockercraft/0.1.0";

pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(default_headers)
        .build()
}

/// GET `url` and return the body as text.
///
/// Transport failures and non-success statuses are both reported as
/// `UpstreamUnavailable`.
pub async fn fetch_text(client: &Client, url: &str) -> ResolverResult<String> {
    debug!("GET {}", url);

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| ResolverError::unavailable(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ResolverError::unavailable(url, format!("HTTP {}", status)));
    }

    resp.text()
        .await
        .map_err(|e| ResolverError::unavailable(url, e))
}

/// GET `url` and decode the body as JSON. Decode failures are
/// `MalformedUpstreamData`.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> ResolverResult<T> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).map_err(|e| ResolverError::malformed(url, e))
}

/// Validate an upstream-provided URL before it ends up in a build plan.
pub fn parse_url(source: &str, raw: &str) -> ResolverResult<reqwest::Url> {
    reqwest::Url::parse(raw)
        .map_err(|e| ResolverError::malformed(source, format!("invalid URL {:?}: {}", raw, e)))
}

/// Join a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("https://a.b/x/", "/y"), "https://a.b/x/y");
        assert_eq!(join_url("https://a.b/x", "y/"), "https://a.b/x/y/");
    }

    #[test]
    fn parse_url_rejects_garbage() {
        let err = parse_url("https://source", "not a url").unwrap_err();
        assert!(matches!(err, ResolverError::MalformedUpstreamData { .. }));
    }
}
