use std::future::Future;

use futures_util::stream::{self, StreamExt};
use tracing::debug;

use crate::core::error::ResolverResult;
use crate::core::version::GameVersion;

/// Run `probe` for every version with at most `concurrency` requests in
/// flight. A failing probe drops its version; the survivors come back in
/// input order together with whatever the probe produced.
pub async fn probe_versions<T, F, Fut>(
    versions: Vec<GameVersion>,
    concurrency: usize,
    probe: F,
) -> Vec<(GameVersion, T)>
where
    F: Fn(GameVersion) -> Fut,
    Fut: Future<Output = ResolverResult<T>>,
{
    let total = versions.len();

    let mut found: Vec<(usize, GameVersion, T)> = stream::iter(versions.into_iter().enumerate())
        .map(|(index, version)| {
            let pending = probe(version.clone());
            async move {
                match pending.await {
                    Ok(value) => Some((index, version, value)),
                    Err(e) => {
                        debug!("Dropping {}: {}", version, e);
                        None
                    }
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|result| async move { result })
        .collect()
        .await;

    found.sort_by_key(|(index, _, _)| *index);
    debug!("{} of {} versions passed the probe", found.len(), total);

    found
        .into_iter()
        .map(|(_, version, value)| (version, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::core::error::ResolverError;

    fn versions(ids: &[&str]) -> Vec<GameVersion> {
        ids.iter().map(|id| GameVersion::new(*id)).collect()
    }

    #[tokio::test]
    async fn failures_are_dropped_and_order_is_kept() {
        let input = versions(&["1.21", "1.20.4", "1.20.1", "1.19.2"]);

        let found = probe_versions(input, 4, |v| async move {
            // Newer versions finish last.
            let delay = v.minecraft_components()[1] * 2;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if v.minecraft == "1.20.4" {
                Err(ResolverError::VersionNotFound(v.to_string()))
            } else {
                Ok(v.minecraft.len())
            }
        })
        .await;

        let ids: Vec<_> = found.iter().map(|(v, _)| v.minecraft.as_str()).collect();
        assert_eq!(ids, ["1.21", "1.20.1", "1.19.2"]);
        assert_eq!(found[0].1, 4);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let in_flight = &AtomicUsize::new(0);
        let peak = &AtomicUsize::new(0);
        let input = versions(&["1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "1.8"]);

        let found = probe_versions(input, 2, move |_| async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert_eq!(found.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        let found = probe_versions(Vec::new(), 8, |_| async { Ok(()) }).await;
        assert!(found.is_empty());
    }
}
