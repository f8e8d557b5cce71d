//! # Routing Table
//!
//! An immutable three-way index from triggers to script identifiers, built in
//! one pass over the enabled script records:
//!
//! - **Lifecycle**: document type → event label → ordered script list
//! - **API**: method key → script (last seen wins)
//! - **Permission query**: document type → script (last seen wins)
//!
//! The table is a snapshot. It is never mutated after [`RoutingTableBuilder::build`];
//! changes to stored scripts are picked up by building a new one.
//!
//! # Example
//!
//! ```rust
//! use scriptmap_core::{LifecycleEvent, RoutingTable, ScriptRecord};
//!
//! let table = RoutingTable::from_records([
//!     ScriptRecord::doc_event("S1", "Invoice", LifecycleEvent::Validate),
//!     ScriptRecord::api("S2", "ping"),
//! ]);
//!
//! assert_eq!(table.lifecycle_handlers("Invoice", LifecycleEvent::Validate), ["S1"]);
//! assert_eq!(table.api_handler("ping"), Some("S2"));
//! assert!(table.permission_queries().is_empty());
//! ```

use crate::{
    event::LifecycleEvent,
    record::{ScriptRecord, ScriptType},
};
use std::collections::HashMap;

type EventMap = HashMap<&'static str, Vec<String>>;

/// The routing index for all enabled scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    lifecycle: HashMap<String, EventMap>,
    api: HashMap<String, String>,
    permission_query: HashMap<String, String>,
}

impl RoutingTable {
    /// A table with no routes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from records in retrieval order.
    pub fn from_records(records: impl IntoIterator<Item = ScriptRecord>) -> Self {
        let mut builder = RoutingTableBuilder::new();
        builder.extend(records);
        builder.build()
    }

    /// Scripts to run for `event` on documents of type `doctype`, in order.
    pub fn lifecycle_handlers(&self, doctype: &str, event: LifecycleEvent) -> &[String] {
        self.lifecycle_handlers_by_label(doctype, event.label())
    }

    /// Like [`lifecycle_handlers`](Self::lifecycle_handlers), keyed by event label.
    pub fn lifecycle_handlers_by_label(&self, doctype: &str, label: &str) -> &[String] {
        self.lifecycle
            .get(doctype)
            .and_then(|events| events.get(label))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The script answering API method `method`.
    pub fn api_handler(&self, method: &str) -> Option<&str> {
        self.api.get(method).map(String::as_str)
    }

    /// The permission query script for documents of type `doctype`.
    pub fn permission_query_handler(&self, doctype: &str) -> Option<&str> {
        self.permission_query.get(doctype).map(String::as_str)
    }

    /// Document types that have at least one lifecycle script.
    pub fn doctypes(&self) -> impl Iterator<Item = &str> {
        self.lifecycle.keys().map(String::as_str)
    }

    /// All API routes.
    pub fn api_methods(&self) -> &HashMap<String, String> {
        &self.api
    }

    /// All permission query routes. Always present, possibly empty.
    pub fn permission_queries(&self) -> &HashMap<String, String> {
        &self.permission_query
    }

    /// Total number of routed script references.
    pub fn handler_count(&self) -> usize {
        let lifecycle: usize = self
            .lifecycle
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum();
        lifecycle + self.api.len() + self.permission_query.len()
    }

    /// Whether the table routes nothing.
    pub fn is_empty(&self) -> bool {
        self.lifecycle.is_empty() && self.api.is_empty() && self.permission_query.is_empty()
    }
}

/// Accumulates script records into a [`RoutingTable`].
///
/// Records are taken in the order given. Disabled records and records missing
/// a field their type requires are skipped without error.
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    table: RoutingTable,
}

impl RoutingTableBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one record. Returns whether the record was accepted.
    pub fn insert(&mut self, record: ScriptRecord) -> bool {
        if !record.enabled {
            return false;
        }

        let ScriptRecord {
            name,
            script_type,
            reference_doctype,
            doctype_event,
            api_method,
            ..
        } = record;

        match script_type {
            ScriptType::DocTypeEvent => {
                let (Some(doctype), Some(event)) = (reference_doctype, doctype_event) else {
                    return false;
                };
                self.table
                    .lifecycle
                    .entry(doctype)
                    .or_default()
                    .entry(event.label())
                    .or_default()
                    .push(name);
            }
            ScriptType::PermissionQuery => {
                let Some(doctype) = reference_doctype else {
                    return false;
                };
                self.table.permission_query.insert(doctype, name);
            }
            ScriptType::ApiMethod => {
                let Some(method) = api_method else {
                    return false;
                };
                self.table.api.insert(method, name);
            }
        }
        true
    }

    /// Route every record in order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = ScriptRecord>) -> &mut Self {
        for record in records {
            self.insert(record);
        }
        self
    }

    /// Finish building.
    pub fn build(self) -> RoutingTable {
        self.table
    }
}
