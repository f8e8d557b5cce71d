//! # scriptmap - Event-Driven Script Dispatch
//!
//! `scriptmap` routes three kinds of runtime trigger to user-authored scripts:
//!
//! - **Document lifecycle events** (`before_insert`, `validate`, `on_submit`, ...)
//! - **Inbound API calls**, by method key
//! - **Permission queries**, by document type
//!
//! Routing goes through a lazily built, cached [`RoutingTable`]. Storing and
//! running scripts is left to the host, which plugs in a [`ScriptSource`] and
//! an executor ([`DocEventExecutor`], [`MethodExecutor`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scriptmap::prelude::*;
//!
//! let dispatcher = ScriptDispatcher::builder(my_source, my_executor).build();
//!
//! // Document layer: run "Before Save" scripts for this invoice.
//! dispatcher.dispatch(&mut invoice, "validate", &ExecutionContext::request()).await?;
//!
//! // HTTP layer: answer /api/method/ping with a script, if one exists.
//! let handled = dispatcher.dispatch_api("ping", &ExecutionContext::request()).await?;
//!
//! // Authoring surface: a script was saved.
//! dispatcher.invalidate();
//! ```
//!
//! ## Failures
//!
//! A failing script stops the remaining scripts for the same trigger and is
//! returned as [`ScriptMapError::Script`], carrying a [`UserFacingError`] that
//! references the script. Request-bound failures carry
//! [`StatusHint::ExpectationFailed`] (417) so an HTTP layer can tell user
//! script errors apart from platform faults.

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use scriptmap_core::{
    // Errors
    BoxError,
    // Context
    ContextFlags,
    // Capabilities
    DocEventExecutor,
    Document,
    ExecutionContext,
    // Data model
    LifecycleEvent,
    LinkBuilder,
    MethodExecutor,
    // Routing
    RoutingTable,
    RoutingTableBuilder,
    ScriptMapError,
    ScriptRecord,
    ScriptSource,
    ScriptType,
    StatusHint,
    UnknownVariant,
    UserFacingError,
};

// Cache
pub use scriptmap_std::cache::{CacheBackend, DEFAULT_CACHE_KEY, LocalCache, RoutingCache};

// Dispatch
pub use scriptmap_std::dispatch::{ScriptDispatcher, ScriptDispatcherBuilder};

// Error translation
pub use scriptmap_std::translate::{ErrorTranslator, FormLink, SCRIPT_ERROR_TITLE, SCRIPT_KIND};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use scriptmap_std::testing::*;
}

/// Prelude module - common imports for scriptmap.
///
/// # Usage
///
/// ```rust,ignore
/// use scriptmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Core traits
        DocEventExecutor,
        Document,
        // Context
        ExecutionContext,
        LifecycleEvent,
        MethodExecutor,
        // Dispatch
        ScriptDispatcher,
        ScriptMapError,
        ScriptRecord,
        ScriptSource,
        StatusHint,
        UserFacingError,
    };
}
