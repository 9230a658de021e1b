use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::error::{ResolverError, ResolverResult};
use crate::core::loaders::RuntimeDescriptor;

/// Streams resolved server artifacts to disk.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// File name used for a downloaded artifact.
    pub fn artifact_file_name(descriptor: &RuntimeDescriptor) -> String {
        format!("minecraft_server_{}.jar", descriptor.canonical_name())
    }

    /// Download the artifact of `descriptor` into `directory`.
    pub async fn download_artifact(
        &self,
        descriptor: &RuntimeDescriptor,
        directory: &Path,
    ) -> ResolverResult<PathBuf> {
        let dest = directory.join(Self::artifact_file_name(descriptor));
        info!("Downloading {} to {:?}", descriptor.canonical_name(), dest);
        self.download_file(descriptor.download_url(), &dest).await?;
        Ok(dest)
    }

    /// Download a single file to `dest`, creating parent directories as
    /// needed. The body is streamed; a failed transfer leaves no file behind.
    pub async fn download_file(&self, url: &str, dest: &Path) -> ResolverResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ResolverError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolverError::unavailable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::unavailable(url, format!("HTTP {}", status)));
        }

        let io_err = |e: std::io::Error| ResolverError::Io {
            path: dest.to_path_buf(),
            source: e,
        };

        let mut written = 0u64;
        // The handle is closed at the end of this block, before any cleanup.
        let result = {
            let mut file = tokio::fs::File::create(dest).await.map_err(io_err)?;
            let mut body = response.bytes_stream();
            let mut result = Ok(());
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        result = Err(ResolverError::unavailable(url, e));
                        break;
                    }
                };
                if let Err(e) = file.write_all(&chunk).await {
                    result = Err(io_err(e));
                    break;
                }
                written += chunk.len() as u64;
            }
            if result.is_ok() {
                result = file.flush().await.map_err(io_err);
            }
            result
        };

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(e);
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, written);
        Ok(written)
    }
}
