//! # Script Dispatch
//!
//! [`ScriptDispatcher`] routes the three kinds of trigger to user-authored
//! scripts through a shared [`RoutingCache`]:
//!
//! | Trigger | Method | Handlers | On routing miss |
//! |---------|--------|----------|-----------------|
//! | Lifecycle event | [`dispatch`](ScriptDispatcher::dispatch) | ordered list | no-op |
//! | API call | [`dispatch_api`](ScriptDispatcher::dispatch_api) | at most one | `Ok(false)` |
//! | Permission query | [`dispatch_permission_query`](ScriptDispatcher::dispatch_permission_query) | at most one | `Ok(None)` |
//!
//! Every script failure is turned into a [`UserFacingError`] by the
//! [`ErrorTranslator`] and returned as [`ScriptMapError::Script`].
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = ScriptDispatcher::builder(source, executor).build();
//!
//! dispatcher.dispatch(&mut invoice, "validate", &ctx).await?;
//! if !dispatcher.dispatch_api("ping", &ctx).await? {
//!     // no script answers this method
//! }
//! ```
//!
//! [`UserFacingError`]: scriptmap_core::UserFacingError
//! [`ScriptMapError::Script`]: scriptmap_core::ScriptMapError::Script

mod api;
mod lifecycle;
mod permission;

use crate::{
    cache::{CacheBackend, LocalCache, RoutingCache},
    translate::{ErrorTranslator, FormLink},
};
use scriptmap_core::{LinkBuilder, ScriptSource};
use std::borrow::Cow;

/// Routes triggers to scripts and runs them.
pub struct ScriptDispatcher<S, X, L = FormLink, B = LocalCache> {
    cache: RoutingCache<S, B>,
    executor: X,
    translator: ErrorTranslator<L>,
}

impl<S: ScriptSource, X> ScriptDispatcher<S, X> {
    /// Start building a dispatcher over `source` that runs scripts with `executor`.
    pub fn builder(source: S, executor: X) -> ScriptDispatcherBuilder<S, X> {
        ScriptDispatcherBuilder::new(source, executor)
    }
}

impl<S, X, L, B> ScriptDispatcher<S, X, L, B>
where
    S: ScriptSource,
    L: LinkBuilder,
    B: CacheBackend,
{
    /// Assemble a dispatcher from its parts.
    pub fn from_parts(cache: RoutingCache<S, B>, executor: X, translator: ErrorTranslator<L>) -> Self {
        Self {
            cache,
            executor,
            translator,
        }
    }

    /// The routing cache.
    pub fn cache(&self) -> &RoutingCache<S, B> {
        &self.cache
    }

    /// The script executor.
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// The error translator.
    pub fn translator(&self) -> &ErrorTranslator<L> {
        &self.translator
    }

    /// Drop the cached routing table.
    ///
    /// Call whenever a script is created, updated, deleted, enabled or disabled.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

/// Builder for constructing a [`ScriptDispatcher`].
pub struct ScriptDispatcherBuilder<S, X, L = FormLink, B = LocalCache> {
    source: S,
    executor: X,
    links: L,
    backend: B,
    key: Option<Cow<'static, str>>,
}

impl<S, X> ScriptDispatcherBuilder<S, X> {
    /// Create a builder with [`FormLink`] links and a [`LocalCache`].
    pub fn new(source: S, executor: X) -> Self {
        Self {
            source,
            executor,
            links: FormLink,
            backend: LocalCache::new(),
            key: None,
        }
    }
}

impl<S, X, L, B> ScriptDispatcherBuilder<S, X, L, B> {
    /// Render script references with `links`.
    pub fn link_builder<L2: LinkBuilder>(self, links: L2) -> ScriptDispatcherBuilder<S, X, L2, B> {
        ScriptDispatcherBuilder {
            source: self.source,
            executor: self.executor,
            links,
            backend: self.backend,
            key: self.key,
        }
    }

    /// Store the routing table in `backend`.
    pub fn backend<B2: CacheBackend>(self, backend: B2) -> ScriptDispatcherBuilder<S, X, L, B2> {
        ScriptDispatcherBuilder {
            source: self.source,
            executor: self.executor,
            links: self.links,
            backend,
            key: self.key,
        }
    }

    /// Store the routing table under `key` instead of the default.
    pub fn cache_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl<S, X, L, B> ScriptDispatcherBuilder<S, X, L, B>
where
    S: ScriptSource,
    L: LinkBuilder,
    B: CacheBackend,
{
    /// Build the dispatcher.
    pub fn build(self) -> ScriptDispatcher<S, X, L, B> {
        let mut cache = RoutingCache::with_backend(self.source, self.backend);
        if let Some(key) = self.key {
            cache = cache.with_key(key);
        }
        ScriptDispatcher::from_parts(cache, self.executor, ErrorTranslator::with_links(self.links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cache::DEFAULT_CACHE_KEY, testing::{RecordingExecutor, StaticSource}};
    use scriptmap_core::{ExecutionContext, ScriptRecord};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_builder_wires_cache_key_and_backend() {
        let backend = Arc::new(LocalCache::new());
        let dispatcher = ScriptDispatcher::builder(
            StaticSource::new(vec![ScriptRecord::api("S1", "ping")]),
            RecordingExecutor::new(),
        )
        .backend(Arc::clone(&backend))
        .cache_key("tenant_1")
        .build();

        assert!(dispatcher.dispatch_api("ping", &ExecutionContext::new()).await.unwrap());
        assert!(backend.get_value("tenant_1").is_some());
        assert!(backend.get_value(DEFAULT_CACHE_KEY).is_none());

        dispatcher.invalidate();
        assert!(backend.is_empty());
    }
}
