//! Lifecycle event dispatch.

use super::ScriptDispatcher;
use crate::cache::CacheBackend;
use scriptmap_core::{
    DocEventExecutor, Document, ExecutionContext, LifecycleEvent, LinkBuilder, ScriptMapError,
    ScriptSource,
};

impl<S, X, L, B> ScriptDispatcher<S, X, L, B>
where
    S: ScriptSource,
    L: LinkBuilder,
    B: CacheBackend,
{
    /// Run the scripts registered for lifecycle event `event` on `doc`.
    ///
    /// Unrecognized event names are ignored. See
    /// [`dispatch_event`](Self::dispatch_event) for the rest.
    pub async fn dispatch<D>(
        &self,
        doc: &mut D,
        event: &str,
        ctx: &ExecutionContext,
    ) -> Result<(), ScriptMapError>
    where
        D: Document,
        X: DocEventExecutor<D>,
    {
        match LifecycleEvent::from_name(event) {
            Some(event) => self.dispatch_event(doc, event, ctx).await,
            None => Ok(()),
        }
    }

    /// Run the scripts registered for `event` on `doc`, in table order.
    ///
    /// Nothing runs while the site is being installed or migrated. Scripts
    /// run one after another; the first failure stops the chain and is
    /// returned translated, so later scripts for the same event never run.
    pub async fn dispatch_event<D>(
        &self,
        doc: &mut D,
        event: LifecycleEvent,
        ctx: &ExecutionContext,
    ) -> Result<(), ScriptMapError>
    where
        D: Document,
        X: DocEventExecutor<D>,
    {
        if ctx.is_bootstrapping() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                doctype = doc.doctype(),
                event = event.name(),
                "lifecycle scripts suppressed during bootstrap"
            );
            return Ok(());
        }

        let table = self.cache.get(ctx).await?;
        let scripts = table.lifecycle_handlers(doc.doctype(), event);

        for script in scripts {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                script = %script,
                doctype = doc.doctype(),
                event = event.name(),
                "running lifecycle script"
            );

            if let Err(failure) = self.executor.execute_doc_event(script, doc).await {
                return Err(self.translator.translate(script, failure, ctx).into());
            }
        }
        Ok(())
    }
}
