//! # scriptmap-std
//!
//! Standard implementations for the scriptmap dispatch layer.
//!
//! This crate provides:
//! - **Routing cache**: [`RoutingCache`] over a pluggable [`CacheBackend`]
//! - **Dispatch**: [`ScriptDispatcher`] for lifecycle, API and permission query triggers
//! - **Error translation**: [`ErrorTranslator`] and the default [`FormLink`]
//! - **Testing**: in-memory collaborators in [`testing`]
//!
//! [`RoutingCache`]: cache::RoutingCache
//! [`CacheBackend`]: cache::CacheBackend
//! [`ScriptDispatcher`]: dispatch::ScriptDispatcher
//! [`ErrorTranslator`]: translate::ErrorTranslator
//! [`FormLink`]: translate::FormLink

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use scriptmap_core;

// Modules
pub mod cache;
pub mod dispatch;
pub mod testing;
pub mod translate;
