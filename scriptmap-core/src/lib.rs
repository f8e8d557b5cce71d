//! # scriptmap-core
//!
//! Core types for the scriptmap dispatch layer.
//!
//! This crate has minimal dependencies and is meant to be imported by the
//! storage and execution backends that plug into `scriptmap-std`, without
//! pulling in the cache or dispatchers.
//!
//! # Contents
//!
//! - **Data model**: [`ScriptRecord`], [`ScriptType`], [`LifecycleEvent`]
//! - **Routing**: [`RoutingTable`] and its [`RoutingTableBuilder`]
//! - **Context**: [`ExecutionContext`] and [`ContextFlags`]
//! - **Capabilities**: [`ScriptSource`], [`DocEventExecutor`],
//!   [`MethodExecutor`], [`LinkBuilder`], [`Document`]
//!
//! # Error Types
//!
//! - [`ScriptMapError`] - Top-level error type
//! - [`UserFacingError`] - Translated script failure
//! - [`StatusHint`] - Transport status attached to a translated failure

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod capability;
mod context;
mod error;
mod event;
mod record;
mod table;

// Re-exports
pub use capability::{DocEventExecutor, Document, LinkBuilder, MethodExecutor, ScriptSource};
pub use context::{ContextFlags, ExecutionContext};
pub use error::{BoxError, ScriptMapError, StatusHint, UnknownVariant, UserFacingError};
pub use event::LifecycleEvent;
pub use record::{ScriptRecord, ScriptType};
pub use table::{RoutingTable, RoutingTableBuilder};
