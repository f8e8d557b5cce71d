//! # Collaborator Capabilities
//!
//! The dispatch layer does not store scripts, run them, or render links. It
//! consumes those capabilities from the hosting service through the traits in
//! this module:
//!
//! - [`ScriptSource`] - Reads enabled script records from storage
//! - [`DocEventExecutor`] - Runs a lifecycle script against a document
//! - [`MethodExecutor`] - Runs API and permission query scripts
//! - [`LinkBuilder`] - Renders a reference to a record for error messages
//!
//! All fallible capabilities fail with [`BoxError`]; the dispatch layer never
//! inspects the failure, it only carries it.

use crate::{error::BoxError, record::ScriptRecord};
use std::future::Future;

/// A document that lifecycle scripts run against.
///
/// The document is opaque to the dispatch layer except for its type name,
/// which selects the handlers.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a scriptable document",
    label = "missing `Document` implementation",
    note = "Implement `Document` and return the document type name from `doctype`."
)]
pub trait Document: Send + Sync {
    /// The document type name, e.g. `"Invoice"`.
    fn doctype(&self) -> &str;
}

/// Storage of script records.
pub trait ScriptSource: Send + Sync {
    /// Fetch every enabled script record, in storage order.
    fn fetch_enabled_scripts(
        &self,
    ) -> impl Future<Output = Result<Vec<ScriptRecord>, BoxError>> + Send;

    /// Whether the backing storage for scripts exists.
    ///
    /// Only consulted while a patch is being applied.
    fn is_provisioned(&self) -> impl Future<Output = Result<bool, BoxError>> + Send;
}

/// Runs lifecycle scripts against documents of type `D`.
///
/// The script may mutate the document in place.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot run lifecycle scripts against `{D}`",
    label = "missing `DocEventExecutor` implementation",
    note = "Implement `DocEventExecutor<{D}>` to run scripts on this document type."
)]
pub trait DocEventExecutor<D: Document>: Send + Sync {
    /// Execute the script `script` with `doc` in scope.
    fn execute_doc_event(
        &self,
        script: &str,
        doc: &mut D,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Runs API and permission query scripts.
pub trait MethodExecutor: Send + Sync {
    /// Execute an API script. The script writes its own response.
    fn execute_api_method(&self, script: &str) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Execute a permission query script for `user`, returning extra query
    /// conditions if the script produced any.
    fn execute_permission_query(
        &self,
        script: &str,
        user: Option<&str>,
    ) -> impl Future<Output = Result<Option<String>, BoxError>> + Send;
}

/// Renders a human-readable reference to a stored record.
pub trait LinkBuilder: Send + Sync {
    /// Reference the record `identifier` of kind `kind`.
    fn link(&self, kind: &str, identifier: &str) -> String;
}

impl<F> LinkBuilder for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn link(&self, kind: &str, identifier: &str) -> String {
        self(kind, identifier)
    }
}
