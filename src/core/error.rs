use std::path::PathBuf;
use thiserror::Error;

use crate::core::loaders::LoaderType;

/// Central error type for the resolver backend.
/// Every module returns `Result<T, ResolverError>`.
#[derive(Debug, Error)]
pub enum ResolverError {
    // ── Network ─────────────────────────────────────────
    #[error("Upstream unavailable at {url}: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    // ── Upstream data ───────────────────────────────────
    #[error("Malformed upstream data from {url}: {reason}")]
    MalformedUpstreamData { url: String, reason: String },

    // ── Versions ────────────────────────────────────────
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("No versions found for {0}")]
    NoVersionsFound(LoaderType),

    #[error("Invalid game version: {0}")]
    InvalidGameVersion(String),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Settings ────────────────────────────────────────
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Convenience alias used throughout the crate.
pub type ResolverResult<T> = Result<T, ResolverError>;

impl ResolverError {
    pub fn unavailable(url: &str, reason: impl ToString) -> Self {
        ResolverError::UpstreamUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(url: &str, reason: impl ToString) -> Self {
        ResolverError::MalformedUpstreamData {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
