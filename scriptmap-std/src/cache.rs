//! # Routing Cache
//!
//! Holds the one [`RoutingTable`] for the process, building it on first use
//! and keeping it until [`RoutingCache::invalidate`] is called.
//!
//! Tables are built completely before they are published to the backend, and
//! readers only ever receive an `Arc` to a finished table. Concurrent misses
//! may each build a table. A build that was already running when
//! [`RoutingCache::invalidate`] was called hands its table to its own caller
//! but never publishes it.
//!
//! # Backends
//!
//! | Backend | Use Case |
//! |---------|----------|
//! | [`LocalCache`] | In-process cache, the default |
//! | custom [`CacheBackend`] | Shared key/value store owned by the host |

use arc_swap::ArcSwap;
use scriptmap_core::{ExecutionContext, RoutingTable, ScriptMapError, ScriptSource};
use std::{
    borrow::Cow,
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// The key the routing table is stored under.
pub const DEFAULT_CACHE_KEY: &str = "server_script_map";

/// A process-wide key/value store for routing tables.
pub trait CacheBackend: Send + Sync {
    /// Read the table stored under `key`.
    fn get_value(&self, key: &str) -> Option<Arc<RoutingTable>>;

    /// Store `table` under `key`, replacing any previous table.
    fn set_value(&self, key: &str, table: Arc<RoutingTable>);

    /// Remove the table stored under `key`.
    fn delete_value(&self, key: &str);
}

impl<B: CacheBackend + ?Sized> CacheBackend for Arc<B> {
    fn get_value(&self, key: &str) -> Option<Arc<RoutingTable>> {
        (**self).get_value(key)
    }

    fn set_value(&self, key: &str, table: Arc<RoutingTable>) {
        (**self).set_value(key, table)
    }

    fn delete_value(&self, key: &str) {
        (**self).delete_value(key)
    }
}

/// Lock-free in-process [`CacheBackend`].
///
/// Every write publishes a fresh map, so readers never see a half-applied
/// update.
#[derive(Default)]
pub struct LocalCache {
    slots: ArcSwap<HashMap<String, Arc<RoutingTable>>>,
}

impl LocalCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tables.
    pub fn len(&self) -> usize {
        self.slots.load().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.load().is_empty()
    }
}

impl CacheBackend for LocalCache {
    fn get_value(&self, key: &str) -> Option<Arc<RoutingTable>> {
        self.slots.load().get(key).cloned()
    }

    fn set_value(&self, key: &str, table: Arc<RoutingTable>) {
        self.slots.rcu(|slots| {
            let mut slots = HashMap::clone(slots);
            slots.insert(key.to_owned(), Arc::clone(&table));
            slots
        });
    }

    fn delete_value(&self, key: &str) {
        self.slots.rcu(|slots| {
            let mut slots = HashMap::clone(slots);
            slots.remove(key);
            slots
        });
    }
}

/// Read-through cache of the routing table.
pub struct RoutingCache<S, B = LocalCache> {
    source: S,
    backend: B,
    key: Cow<'static, str>,
    /// Bumped by every invalidation.
    generation: AtomicU64,
}

impl<S: ScriptSource> RoutingCache<S, LocalCache> {
    /// Create a cache over `source` backed by a [`LocalCache`].
    pub fn new(source: S) -> Self {
        Self::with_backend(source, LocalCache::new())
    }
}

impl<S: ScriptSource, B: CacheBackend> RoutingCache<S, B> {
    /// Create a cache over `source` stored in `backend`.
    pub fn with_backend(source: S, backend: B) -> Self {
        Self {
            source,
            backend,
            key: Cow::Borrowed(DEFAULT_CACHE_KEY),
            generation: AtomicU64::new(0),
        }
    }

    /// Store the table under a different key.
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }

    /// The key the table is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying record source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the current routing table, building it on a miss.
    ///
    /// While a patch is applied and script storage does not exist yet, an
    /// empty table is returned and nothing is cached. Record source failures
    /// are returned as [`ScriptMapError::Storage`].
    pub async fn get(&self, ctx: &ExecutionContext) -> Result<Arc<RoutingTable>, ScriptMapError> {
        if ctx.in_patch()
            && !self
                .source
                .is_provisioned()
                .await
                .map_err(ScriptMapError::Storage)?
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                key = %self.key,
                "script storage not provisioned, using empty routing table"
            );
            return Ok(Arc::new(RoutingTable::empty()));
        }

        if let Some(table) = self.backend.get_value(&self.key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(key = %self.key, "routing table cache hit");
            return Ok(table);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let records = self
            .source
            .fetch_enabled_scripts()
            .await
            .map_err(ScriptMapError::Storage)?;

        #[cfg(feature = "tracing")]
        let fetched = records.len();

        let table = Arc::new(RoutingTable::from_records(records));
        if !self.publish(generation, &table) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                key = %self.key,
                "routing table invalidated during rebuild, not publishing"
            );
            return Ok(table);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            key = %self.key,
            records = fetched,
            routes = table.handler_count(),
            "routing table rebuilt"
        );

        Ok(table)
    }

    /// Drop the cached table. The next [`get`](Self::get) rebuilds it.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.backend.delete_value(&self.key);

        #[cfg(feature = "tracing")]
        tracing::debug!(key = %self.key, "routing table invalidated");
    }

    /// Store `table` unless an invalidation happened since `generation` was
    /// read. Returns whether the table stayed published.
    fn publish(&self, generation: u64, table: &Arc<RoutingTable>) -> bool {
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        self.backend.set_value(&self.key, Arc::clone(table));

        // An invalidation may have landed between the check and the store.
        if self.generation.load(Ordering::Acquire) != generation {
            self.backend.delete_value(&self.key);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSource;
    use scriptmap_core::{BoxError, ContextFlags, LifecycleEvent, ScriptRecord};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn source() -> StaticSource {
        StaticSource::new(vec![
            ScriptRecord::doc_event("S1", "Invoice", LifecycleEvent::Validate),
            ScriptRecord::api("S2", "ping"),
        ])
    }

    #[tokio::test]
    async fn test_hit_does_not_refetch() {
        let cache = RoutingCache::new(source());
        let ctx = ExecutionContext::new();

        let first = cache.get(&ctx).await.unwrap();
        let second = cache.get(&ctx).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_triggers_one_rebuild() {
        let cache = RoutingCache::new(source());
        let ctx = ExecutionContext::new();
        cache.get(&ctx).await.unwrap();

        cache.invalidate();
        cache.get(&ctx).await.unwrap();
        cache.get(&ctx).await.unwrap();

        assert_eq!(cache.source().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_unprovisioned_patch_returns_empty_table() {
        let source = source();
        source.set_provisioned(false);
        let cache = RoutingCache::new(source);
        let ctx = ExecutionContext::new().with_flags(ContextFlags::IN_PATCH);

        let table = cache.get(&ctx).await.unwrap();

        assert!(table.is_empty());
        assert_eq!(cache.source().fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_provisioned_patch_reads_normally() {
        let cache = RoutingCache::new(source());
        let ctx = ExecutionContext::new().with_flags(ContextFlags::IN_PATCH);

        let table = cache.get(&ctx).await.unwrap();

        assert_eq!(table.api_handler("ping"), Some("S2"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_passed_through() {
        let source = source();
        source.fail_with("database is locked");
        let cache = RoutingCache::new(source);

        let err = cache.get(&ExecutionContext::new()).await.unwrap_err();

        assert!(matches!(err, ScriptMapError::Storage(_)));
        assert_eq!(err.to_string(), "database is locked");
    }

    #[tokio::test]
    async fn test_custom_key_and_shared_backend() {
        let backend = Arc::new(LocalCache::new());
        let cache = RoutingCache::with_backend(source(), Arc::clone(&backend)).with_key("site_a");

        cache.get(&ExecutionContext::new()).await.unwrap();

        assert_eq!(cache.key(), "site_a");
        assert!(backend.get_value("site_a").is_some());
        assert!(backend.get_value(DEFAULT_CACHE_KEY).is_none());

        cache.invalidate();
        assert!(backend.is_empty());
    }

    /// Source whose fetch reads its records, then waits until released.
    struct GatedSource {
        records: Mutex<Vec<ScriptRecord>>,
        fetches: AtomicU64,
        entered: Notify,
        gate: Notify,
    }

    impl ScriptSource for GatedSource {
        async fn fetch_enabled_scripts(&self) -> Result<Vec<ScriptRecord>, BoxError> {
            let records = self.records.lock().unwrap().clone();
            if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.notify_one();
                self.gate.notified().await;
            }
            Ok(records)
        }

        async fn is_provisioned(&self) -> Result<bool, BoxError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_invalidate_during_rebuild_is_not_lost() {
        let cache = RoutingCache::new(GatedSource {
            records: Mutex::new(vec![ScriptRecord::doc_event(
                "old",
                "Invoice",
                LifecycleEvent::Validate,
            )]),
            fetches: AtomicU64::new(0),
            entered: Notify::new(),
            gate: Notify::new(),
        });
        let ctx = ExecutionContext::new();

        let (stale, ()) = tokio::join!(cache.get(&ctx), async {
            cache.source().entered.notified().await;
            cache.source().records.lock().unwrap().push(ScriptRecord::doc_event(
                "new",
                "Invoice",
                LifecycleEvent::Validate,
            ));
            cache.invalidate();
            cache.source().gate.notify_one();
        });

        let stale = stale.unwrap();
        assert_eq!(
            stale.lifecycle_handlers("Invoice", LifecycleEvent::Validate),
            ["old"]
        );

        let fresh = cache.get(&ctx).await.unwrap();
        assert_eq!(
            fresh.lifecycle_handlers("Invoice", LifecycleEvent::Validate),
            ["old", "new"]
        );
        assert_eq!(cache.source().fetches.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(&fresh, &cache.get(&ctx).await.unwrap()));
    }
}
