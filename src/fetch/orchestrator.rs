//! Fetch Orchestrator
//!
//! Returns cached data when it is still live, otherwise fetches, caches and
//! returns fresh data.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::ExpiringStore;
use crate::error::{CacheError, Result};
use crate::fetch::hooks::{FailureNotifier, ProgressGuard, ProgressHook, FETCH_FAILURE_MESSAGE};
use crate::fetch::key::{CacheKeyBuilder, Tokenizer};
use crate::fetch::FetchStrategy;

// == TTL Override ==
/// How the orchestrator picks the lifetime of entries it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtlOverride {
    /// Use the store's default TTL
    #[default]
    StoreDefault,
    /// Write entries without expiration
    NeverExpire,
    /// Write entries expiring after the given minutes
    Minutes(u64),
}

/// Store and base key the orchestrator caches under.
struct CacheBinding {
    store: Arc<ExpiringStore>,
    base_key: String,
}

// == Fetch Orchestrator ==
/// Fetch-or-cache coordinator around a [`FetchStrategy`].
///
/// # Example
/// ```ignore
/// let users = FetchOrchestrator::new(Arc::new(fetch_user))
///     .with_cache(store.clone(), "users");
/// let user = users.get_or_fetch(&[json!(42)]).await?; // cached under "users_42"
/// ```
pub struct FetchOrchestrator {
    strategy: Arc<dyn FetchStrategy>,
    binding: Option<CacheBinding>,
    ttl: TtlOverride,
    keys: CacheKeyBuilder,
    progress: Option<Arc<dyn ProgressHook>>,
    notifier: Option<Arc<dyn FailureNotifier>>,
}

impl FetchOrchestrator {
    // == Constructor ==
    /// Creates an orchestrator without cache, hooks or TTL override.
    pub fn new(strategy: Arc<dyn FetchStrategy>) -> Self {
        Self {
            strategy,
            binding: None,
            ttl: TtlOverride::StoreDefault,
            keys: CacheKeyBuilder::default(),
            progress: None,
            notifier: None,
        }
    }

    // == Builders ==
    /// Caches results in `store` under keys derived from `base_key`.
    pub fn with_cache(mut self, store: Arc<ExpiringStore>, base_key: impl Into<String>) -> Self {
        self.binding = Some(CacheBinding {
            store,
            base_key: base_key.into(),
        });
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHook>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn FailureNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replaces the snake-case tokenizer used for key fragments.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.keys = CacheKeyBuilder::new(tokenizer);
        self
    }

    // == TTL Configuration ==
    /// Writes subsequent entries with an explicit TTL in minutes.
    pub fn configure_ttl(&mut self, minutes: u64) {
        self.ttl = TtlOverride::Minutes(minutes);
    }

    /// Writes subsequent entries without expiration.
    pub fn configure_never_expire(&mut self) {
        self.ttl = TtlOverride::NeverExpire;
    }

    pub fn ttl_override(&self) -> TtlOverride {
        self.ttl
    }

    // == Cache Key ==
    /// The key `params` are cached under, or None without a cache binding.
    pub fn cache_key(&self, params: &[Value]) -> Option<String> {
        self.binding
            .as_ref()
            .map(|binding| self.keys.build(&binding.base_key, params))
    }

    // == Fetch ==
    /// Fetches fresh data, bypassing any cached entry.
    ///
    /// On success the result is written to the cache (when one is bound).
    pub async fn fetch(&self, params: &[Value]) -> Result<Value> {
        let key = self.cache_key(params);
        self.fetch_and_store(params, key.as_deref()).await
    }

    // == Get Or Fetch ==
    /// Returns the live cached value for `params`, fetching on a miss.
    ///
    /// Empty cached values (`null`, `{}`, `[]`, `""`) count as misses.
    pub async fn get_or_fetch(&self, params: &[Value]) -> Result<Value> {
        let Some(binding) = &self.binding else {
            return self.fetch(params).await;
        };

        let key = self.keys.build(&binding.base_key, params);
        match binding.store.get(&key) {
            Some(cached) if !is_empty_value(&cached) => return Ok(cached),
            Some(_) => debug!("Ignoring empty cached value for key '{}'", key),
            None => {}
        }

        self.fetch_and_store(params, Some(&key)).await
    }

    async fn fetch_and_store(&self, params: &[Value], key: Option<&str>) -> Result<Value> {
        info!("Fetching data for key '{}'", key.unwrap_or("<uncached>"));

        let result = {
            let _progress = ProgressGuard::show(self.progress.as_deref());
            self.strategy.fetch(params).await
        };

        match result {
            Ok(data) => {
                if let Some(key) = key {
                    self.store_result(key, &data);
                }
                Ok(data)
            }
            Err(err) => {
                warn!("Fetch failed: {:#}", err);
                if let Some(notifier) = &self.notifier {
                    notifier.notify(FETCH_FAILURE_MESSAGE);
                }
                Err(CacheError::Fetch(err))
            }
        }
    }

    /// Writes a fetched result. Failures are logged, never returned.
    fn store_result(&self, key: &str, data: &Value) {
        let Some(binding) = &self.binding else {
            return;
        };

        let written = match self.ttl {
            TtlOverride::NeverExpire => binding.store.forever(key, data.clone()),
            TtlOverride::StoreDefault => binding.store.set(key, data.clone(), None),
            TtlOverride::Minutes(minutes) => binding.store.set(key, data.clone(), Some(minutes)),
        };

        if let Err(err) = written {
            warn!("Failed to cache result for key '{}': {}", key, err);
        }
    }
}

/// Values that must not count as a cache hit.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, ManualClock};
    use crate::fetch::hooks::ProgressOptions;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const NOW: u64 = 1_700_000_000_000;

    // == Test Fixtures ==
    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<&'static str>>,
        messages: Mutex<Vec<String>>,
    }

    impl RecordingHooks {
        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }

        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl ProgressHook for RecordingHooks {
        fn show(&self, options: &ProgressOptions) {
            assert!(!options.backdrop);
            self.events.lock().unwrap().push("show");
        }

        fn hide(&self) {
            self.events.lock().unwrap().push("hide");
        }
    }

    impl FailureNotifier for RecordingHooks {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    /// Storage that accepts reads but rejects every write.
    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&self, _key: &str, _value: String) -> Result<()> {
            Err(CacheError::Storage("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn counting_strategy(calls: Arc<AtomicUsize>, data: Value) -> Arc<dyn FetchStrategy> {
        Arc::new(move |_params: Vec<Value>| {
            calls.fetch_add(1, Ordering::SeqCst);
            let data = data.clone();
            async move { Ok::<_, anyhow::Error>(data) }
        })
    }

    fn failing_strategy(calls: Arc<AtomicUsize>) -> Arc<dyn FetchStrategy> {
        Arc::new(move |_params: Vec<Value>| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err::<Value, _>(anyhow::anyhow!("network error")) }
        })
    }

    fn create_store() -> (Arc<ExpiringStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(NOW));
        let store = ExpiringStore::with_clock(Arc::new(MemoryStorage::new()), 30, clock.clone());
        (Arc::new(store), clock)
    }

    fn users(store: &Arc<ExpiringStore>, strategy: Arc<dyn FetchStrategy>) -> FetchOrchestrator {
        FetchOrchestrator::new(strategy).with_cache(store.clone(), "users")
    }

    // == Scenarios ==
    #[tokio::test]
    async fn test_miss_fetches_once_and_caches() {
        let (store, _) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let ana = json!({"id": 42, "name": "Ana"});
        let orchestrator = users(&store, counting_strategy(calls.clone(), ana.clone()));

        let data = orchestrator.get_or_fetch(&[json!(42)]).await.unwrap();

        assert_eq!(data, ana);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.entry("users_42").unwrap().value, ana);
    }

    #[tokio::test]
    async fn test_hit_skips_fetch_and_progress() {
        let (store, _) = create_store();
        store
            .put_entry(
                "users_42",
                CacheEntry {
                    value: json!({"id": 42}),
                    expires_at: Some(NOW + 60_000),
                },
            )
            .unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let hooks = Arc::new(RecordingHooks::default());
        let orchestrator = users(&store, counting_strategy(calls.clone(), json!("fresh")))
            .with_progress(hooks.clone());

        let data = orchestrator.get_or_fetch(&[json!(42)]).await.unwrap();

        assert_eq!(data, json!({"id": 42}));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(hooks.events().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cached_value_is_a_miss() {
        let (store, _) = create_store();
        store.set("users_42", json!({}), None).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls.clone(), json!({"id": 42})));

        let data = orchestrator.get_or_fetch(&[json!(42)]).await.unwrap();

        assert_eq!(data, json!({"id": 42}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_propagates_and_pairs_progress() {
        let (store, _) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let hooks = Arc::new(RecordingHooks::default());
        let orchestrator = users(&store, failing_strategy(calls.clone()))
            .with_progress(hooks.clone())
            .with_notifier(hooks.clone());

        let err = orchestrator.get_or_fetch(&[json!(42)]).await.unwrap_err();

        assert!(matches!(err, CacheError::Fetch(_)));
        assert_eq!(err.to_string(), "network error");
        assert_eq!(hooks.messages(), vec![FETCH_FAILURE_MESSAGE.to_string()]);
        assert_eq!(hooks.events(), vec!["show", "hide"]);
        assert!(store.entry("users_42").is_none());
    }

    #[tokio::test]
    async fn test_success_pairs_progress() {
        let (store, _) = create_store();
        let hooks = Arc::new(RecordingHooks::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls, json!([1])))
            .with_progress(hooks.clone())
            .with_notifier(hooks.clone());

        orchestrator.get_or_fetch(&[json!(1)]).await.unwrap();

        assert_eq!(hooks.events(), vec!["show", "hide"]);
        assert!(hooks.messages().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_fetch_still_hides_progress() {
        let hooks = Arc::new(RecordingHooks::default());
        let pending: Arc<dyn FetchStrategy> = Arc::new(|_params: Vec<Value>| {
            std::future::pending::<anyhow::Result<Value>>()
        });
        let orchestrator = FetchOrchestrator::new(pending).with_progress(hooks.clone());

        let outcome =
            tokio::time::timeout(Duration::from_millis(10), orchestrator.get_or_fetch(&[])).await;

        assert!(outcome.is_err());
        assert_eq!(hooks.events(), vec!["show", "hide"]);
    }

    #[tokio::test]
    async fn test_repeated_calls_hit_cache() {
        let (store, _) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls.clone(), json!({"id": 1})));

        for _ in 0..3 {
            orchestrator.get_or_fetch(&[json!(1)]).await.unwrap();
        }
        orchestrator.get_or_fetch(&[json!(2)]).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (store, clock) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls.clone(), json!({"id": 1})));

        orchestrator.get_or_fetch(&[json!(1)]).await.unwrap();
        clock.advance(30 * 60_000);
        orchestrator.get_or_fetch(&[json!(1)]).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_without_cache_always_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator =
            FetchOrchestrator::new(counting_strategy(calls.clone(), json!({"id": 1})));

        orchestrator.get_or_fetch(&[json!(1)]).await.unwrap();
        orchestrator.get_or_fetch(&[json!(1)]).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(orchestrator.cache_key(&[json!(1)]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_bypasses_cache_and_refreshes() {
        let (store, _) = create_store();
        store.set("users_42", json!({"id": 42, "stale": true}), None).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls.clone(), json!({"id": 42})));

        let data = orchestrator.fetch(&[json!(42)]).await.unwrap();

        assert_eq!(data, json!({"id": 42}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get("users_42"), Some(json!({"id": 42})));
    }

    // == TTL Selection ==
    #[tokio::test]
    async fn test_default_ttl_uses_store_default() {
        let (store, _) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls, json!(1)));

        orchestrator.get_or_fetch(&[json!(7)]).await.unwrap();

        assert_eq!(orchestrator.ttl_override(), TtlOverride::StoreDefault);
        assert_eq!(
            store.entry("users_7").unwrap().expires_at,
            Some(NOW + 30 * 60_000)
        );
    }

    #[tokio::test]
    async fn test_configure_ttl_overrides_default() {
        let (store, _) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut orchestrator = users(&store, counting_strategy(calls, json!(1)));
        orchestrator.configure_ttl(2);

        orchestrator.get_or_fetch(&[json!(7)]).await.unwrap();

        assert_eq!(orchestrator.ttl_override(), TtlOverride::Minutes(2));
        assert_eq!(
            store.entry("users_7").unwrap().expires_at,
            Some(NOW + 2 * 60_000)
        );
    }

    #[tokio::test]
    async fn test_configure_never_expire() {
        let (store, clock) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut orchestrator = users(&store, counting_strategy(calls.clone(), json!(1)));
        orchestrator.configure_never_expire();

        orchestrator.get_or_fetch(&[json!(7)]).await.unwrap();
        clock.advance(u64::MAX / 2);
        orchestrator.get_or_fetch(&[json!(7)]).await.unwrap();

        assert!(store.entry("users_7").unwrap().expires_at.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // == Write Isolation ==
    #[tokio::test]
    async fn test_write_failure_still_returns_data() {
        let store = Arc::new(ExpiringStore::new(Arc::new(ReadOnlyStorage), 30));
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls, json!({"id": 42})));

        let data = orchestrator.get_or_fetch(&[json!(42)]).await.unwrap();

        assert_eq!(data, json!({"id": 42}));
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!({})));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!("")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!({"id": 1})));
    }

    #[test]
    fn test_cache_key() {
        let (store, _) = create_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = users(&store, counting_strategy(calls, json!(1)));

        assert_eq!(
            orchestrator.cache_key(&[json!(42), json!("fullProfile")]),
            Some("users_42_full_profile".to_string())
        );
    }
}
