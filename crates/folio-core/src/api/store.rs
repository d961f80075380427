use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use super::client::ProfileSource;
use super::models::ProfileData;
use crate::config::ApiConfig;
use crate::Result;

const INITIAL_RETRY_DELAY_MS: u64 = 1000;
const MAX_RETRY_DELAY_MS: u64 = 30_000;

/// Exponential backoff before retry `attempt` (1-based): 1s, 2s, 4s ... capped at 30s
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(INITIAL_RETRY_DELAY_MS.saturating_mul(factor).min(MAX_RETRY_DELAY_MS))
}

struct CachedProfile {
    fetched_at: Instant,
    profile: Arc<ProfileData>,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CachedProfile>,
    /// Bumped by `invalidate`; a load started under an older generation is not cached
    generation: u64,
}

/// Cached, retrying access to the profile aggregate
///
/// A loaded profile is served from cache until it is older than the stale
/// time. Loads are single-flight: concurrent callers queue on the load lock and
/// reuse what the first one fetched. The cache lock is only held for reads and
/// writes of the entry, never across the network.
pub struct ProfileStore {
    source: Arc<dyn ProfileSource>,
    cache: Mutex<CacheState>,
    load: tokio::sync::Mutex<()>,
    stale_time: Duration,
    max_retries: u32,
}

impl ProfileStore {
    pub fn new(source: Arc<dyn ProfileSource>, config: &ApiConfig) -> Self {
        Self {
            source,
            cache: Mutex::new(CacheState::default()),
            load: tokio::sync::Mutex::new(()),
            stale_time: config.stale_time(),
            max_retries: config.max_retries,
        }
    }

    /// Cached profile if fresh, otherwise load it
    pub async fn get(&self) -> Result<Arc<ProfileData>> {
        if let Some(profile) = self.fresh() {
            return Ok(profile);
        }
        let _loading = self.load.lock().await;
        // Another caller may have finished a load while we waited
        if let Some(profile) = self.fresh() {
            return Ok(profile);
        }
        self.load_now().await
    }

    /// Load regardless of cache freshness
    pub async fn refresh(&self) -> Result<Arc<ProfileData>> {
        let _loading = self.load.lock().await;
        self.load_now().await
    }

    /// Cached profile without loading, fresh or not
    pub async fn cached(&self) -> Option<Arc<ProfileData>> {
        self.state().entry.as_ref().map(|c| c.profile.clone())
    }

    /// Drop the cached profile; a load already in progress will not repopulate it
    pub async fn invalidate(&self) {
        let mut state = self.state();
        state.entry = None;
        state.generation += 1;
    }

    fn fresh(&self) -> Option<Arc<ProfileData>> {
        let state = self.state();
        let cached = state.entry.as_ref()?;
        if cached.fetched_at.elapsed() < self.stale_time {
            Some(cached.profile.clone())
        } else {
            tracing::debug!("Cached profile is stale, reloading");
            None
        }
    }

    async fn load_now(&self) -> Result<Arc<ProfileData>> {
        let generation = self.state().generation;
        let profile = Arc::new(self.fetch_with_retry().await?);

        let mut state = self.state();
        if state.generation == generation {
            state.entry = Some(CachedProfile {
                fetched_at: Instant::now(),
                profile: profile.clone(),
            });
        } else {
            tracing::debug!("Profile invalidated during load, not caching");
        }
        Ok(profile)
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch_with_retry(&self) -> Result<ProfileData> {
        let mut attempt = 0;
        loop {
            match self.source.fetch_profile().await {
                Ok(profile) => return Ok(profile),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Profile load failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::fixtures::PROFILE_JSON;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given status for the first `failures` calls
    struct FlakySource {
        calls: AtomicU32,
        failures: u32,
        status: u16,
    }

    impl FlakySource {
        fn new(failures: u32, status: u16) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                failures,
                status,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileSource for FlakySource {
        async fn fetch_profile(&self) -> Result<ProfileData> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(Error::ApiStatus {
                    status: self.status,
                    reason: String::new(),
                    endpoint: "/api/users/1/profile/".to_string(),
                });
            }
            Ok(serde_json::from_str(PROFILE_JSON)?)
        }
    }

    fn store(source: Arc<FlakySource>) -> ProfileStore {
        ProfileStore::new(source, &ApiConfig::default())
    }

    #[test]
    fn test_backoff_delay() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(10), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_serves_fresh_cache() {
        let source = FlakySource::new(0, 500);
        let store = store(source.clone());

        let first = store.get().await.unwrap();
        tokio::time::sleep(Duration::from_secs(299)).await;
        let second = store.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        store.get().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures_with_backoff() {
        let source = FlakySource::new(2, 503);
        let store = store(source.clone());
        let t0 = Instant::now();

        let profile = store.get().await.unwrap();
        assert_eq!(profile.user.username, "jdoe");
        assert_eq!(source.calls(), 3);
        // 1s + 2s of backoff
        assert!(t0.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let source = FlakySource::new(10, 502);
        let store = store(source.clone());

        let err = store.get().await.unwrap_err();
        assert!(matches!(err, Error::ApiStatus { status: 502, .. }));
        assert_eq!(source.calls(), 4);
        assert!(store.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let source = FlakySource::new(1, 404);
        let store = store(source.clone());

        assert!(store.get().await.is_err());
        assert_eq!(source.calls(), 1);
    }

    /// Never answers until released
    struct StalledSource {
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl ProfileSource for StalledSource {
        async fn fetch_profile(&self) -> Result<ProfileData> {
            self.release.notified().await;
            Ok(serde_json::from_str(PROFILE_JSON)?)
        }
    }

    #[tokio::test]
    async fn test_cache_usable_while_loading() {
        let source = Arc::new(StalledSource {
            release: tokio::sync::Notify::new(),
        });
        let store = Arc::new(ProfileStore::new(source.clone(), &ApiConfig::default()));

        let loader = {
            let store = store.clone();
            tokio::spawn(async move { store.get().await })
        };
        tokio::task::yield_now().await;

        let quick = Duration::from_millis(100);
        assert!(tokio::time::timeout(quick, store.cached()).await.unwrap().is_none());
        tokio::time::timeout(quick, store.invalidate()).await.unwrap();

        // Finishes, but the invalidated load is not cached
        source.release.notify_one();
        let profile = loader.await.unwrap().unwrap();
        assert_eq!(profile.user.username, "jdoe");
        assert!(store.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_load() {
        let source = FlakySource::new(0, 500);
        let store = Arc::new(store(source.clone()));

        let (a, b) = tokio::join!(store.get(), store.get());
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_and_refresh() {
        let source = FlakySource::new(0, 500);
        let store = store(source.clone());

        store.get().await.unwrap();
        store.refresh().await.unwrap();
        assert_eq!(source.calls(), 2);

        store.invalidate().await;
        assert!(store.cached().await.is_none());
        store.get().await.unwrap();
        assert_eq!(source.calls(), 3);
    }
}
