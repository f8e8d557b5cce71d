//! Testing utilities for scriptmap.
//!
//! This module provides in-memory collaborators so dispatch can be tested
//! without real script storage or a script sandbox.
//!
//! # Features
//!
//! - [`StaticSource`]: A record source that counts fetches and can be made to fail
//! - [`RecordingExecutor`]: An executor that records invocations and fails on demand
//! - [`TestDocument`]: A minimal document that scripts leave a trail on
//! - [`ScriptFailure`]: The failure raised by [`RecordingExecutor`]

use scriptmap_core::{
    BoxError, DocEventExecutor, Document, MethodExecutor, ScriptRecord, ScriptSource,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use thiserror::Error;

// ============================================================================
// Static Source
// ============================================================================

/// A [`ScriptSource`] serving a fixed list of records.
///
/// Disabled records are filtered out on fetch, like a storage query would.
///
/// # Example
///
/// ```rust,ignore
/// let source = StaticSource::new(vec![ScriptRecord::api("S1", "ping")]);
/// let cache = RoutingCache::new(source);
///
/// cache.get(&ExecutionContext::new()).await?;
/// assert_eq!(cache.source().fetch_count(), 1);
/// ```
pub struct StaticSource {
    records: Mutex<Vec<ScriptRecord>>,
    fetches: AtomicUsize,
    provisioned: AtomicBool,
    failure: Mutex<Option<String>>,
}

impl StaticSource {
    /// Create a provisioned source serving `records`.
    pub fn new(records: Vec<ScriptRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fetches: AtomicUsize::new(0),
            provisioned: AtomicBool::new(true),
            failure: Mutex::new(None),
        }
    }

    /// Replace the stored records.
    pub fn set_records(&self, records: Vec<ScriptRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Number of completed or attempted fetches.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Set whether script storage exists.
    pub fn set_provisioned(&self, provisioned: bool) {
        self.provisioned.store(provisioned, Ordering::SeqCst);
    }

    /// Make every fetch fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Stop failing.
    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

impl ScriptSource for StaticSource {
    async fn fetch_enabled_scripts(&self) -> Result<Vec<ScriptRecord>, BoxError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(ref message) = *self.failure.lock().unwrap() {
            return Err(message.clone().into());
        }

        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.enabled)
            .cloned()
            .collect())
    }

    async fn is_provisioned(&self) -> Result<bool, BoxError> {
        Ok(self.provisioned.load(Ordering::SeqCst))
    }
}

// ============================================================================
// Test Document
// ============================================================================

/// A document that records which scripts touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDocument {
    /// Document type name.
    pub doctype: String,
    /// Scripts that ran against this document, in order.
    pub trail: Vec<String>,
}

impl TestDocument {
    /// Create a document of type `doctype`.
    pub fn new(doctype: impl Into<String>) -> Self {
        Self {
            doctype: doctype.into(),
            trail: Vec::new(),
        }
    }
}

impl Document for TestDocument {
    fn doctype(&self) -> &str {
        &self.doctype
    }
}

// ============================================================================
// Recording Executor
// ============================================================================

/// The failure raised by [`RecordingExecutor`] for a failing script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{script}: {message}")]
pub struct ScriptFailure {
    script: String,
    message: String,
}

impl ScriptFailure {
    /// Create a failure for `script`.
    pub fn new(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            message: message.into(),
        }
    }

    /// The script that failed.
    pub fn script(&self) -> &str {
        &self.script
    }
}

/// An executor that records every invocation.
///
/// Clones share the same record, so a clone can be kept for inspection after
/// the original is moved into a dispatcher.
///
/// # Example
///
/// ```rust,ignore
/// let executor = RecordingExecutor::new().failing("S2");
/// let probe = executor.clone();
///
/// // hand `executor` to a dispatcher, dispatch...
///
/// assert_eq!(probe.calls(), ["S1", "S2"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<String>>>,
    failing: Arc<HashSet<String>>,
    conditions: Arc<HashMap<String, String>>,
}

impl RecordingExecutor {
    /// Create an executor where every script succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `script` fail with a [`ScriptFailure`].
    pub fn failing(mut self, script: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.failing).insert(script.into());
        self
    }

    /// Make permission query `script` return `conditions`.
    pub fn with_conditions(mut self, script: impl Into<String>, conditions: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.conditions).insert(script.into(), conditions.into());
        self
    }

    /// Scripts invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Forget recorded invocations.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn run(&self, script: &str) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(script.to_owned());
        if self.failing.contains(script) {
            return Err(Box::new(ScriptFailure::new(script, "script raised an exception")));
        }
        Ok(())
    }
}

impl DocEventExecutor<TestDocument> for RecordingExecutor {
    async fn execute_doc_event(&self, script: &str, doc: &mut TestDocument) -> Result<(), BoxError> {
        self.run(script)?;
        doc.trail.push(script.to_owned());
        Ok(())
    }
}

impl MethodExecutor for RecordingExecutor {
    async fn execute_api_method(&self, script: &str) -> Result<(), BoxError> {
        self.run(script)
    }

    async fn execute_permission_query(
        &self,
        script: &str,
        _user: Option<&str>,
    ) -> Result<Option<String>, BoxError> {
        self.run(script)?;
        Ok(self.conditions.get(script).cloned())
    }
}
