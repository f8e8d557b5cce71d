//! Permission query dispatch.

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
    /// Ask the permission query script for `doctype` for extra conditions.
    ///
    /// The acting user is taken from `ctx`. Returns `Ok(None)` when no script
    /// is registered or the script added no conditions.
    pub async fn dispatch_permission_query(
        &self,
        doctype: &str,
        ctx: &ExecutionContext,
    ) -> Result<Option<String>, ScriptMapError> {
        let table = self.cache.get(ctx).await?;
        let Some(script) = table.permission_query_handler(doctype) else {
            return Ok(None);
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            script,
            doctype,
            user = ctx.user(),
            "running permission query script"
        );

        let conditions = self
            .executor
            .execute_permission_query(script, ctx.user())
            .await
            .map_err(|failure| self.translator.translate(script, failure, ctx))?;
        Ok(conditions)
    }
}
