//! API method dispatch.

use super::ScriptDispatcher;
use crate::cache::CacheBackend;
use scriptmap_core::{ExecutionContext, LinkBuilder, MethodExecutor, ScriptMapError, ScriptSource};

impl<S, X, L, B> ScriptDispatcher<S, X, L, B>
where
    S: ScriptSource,
    X: MethodExecutor,
    L: LinkBuilder,
    B: CacheBackend,
{
    /// Run the script answering API method `method`.
    ///
    /// Returns `Ok(false)` if no script answers it; the caller decides what
    /// that means.
    pub async fn dispatch_api(
        &self,
        method: &str,
        ctx: &ExecutionContext,
    ) -> Result<bool, ScriptMapError> {
        let table = self.cache.get(ctx).await?;
        let Some(script) = table.api_handler(method) else {
            return Ok(false);
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(script, method, "running api script");

        self.executor
            .execute_api_method(script)
            .await
            .map_err(|failure| self.translator.translate(script, failure, ctx))?;
        Ok(true)
    }
}
