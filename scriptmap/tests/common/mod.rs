#![allow(dead_code)]

use scriptmap::{
    BoxError, DocEventExecutor, Document, LifecycleEvent, MethodExecutor, ScriptRecord,
    ScriptSource,
};
use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Test Documents
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct Invoice {
    pub total: i64,
    pub fields: BTreeMap<String, String>,
}

impl Document for Invoice {
    fn doctype(&self) -> &str {
        "Sales Invoice"
    }
}

// ============================================================================
// Test Collaborators
// ============================================================================

/// A record source whose records can change between fetches.
#[derive(Clone, Default)]
pub struct SharedSource {
    pub records: Arc<Mutex<Vec<ScriptRecord>>>,
    pub fetches: Arc<AtomicUsize>,
}

impl SharedSource {
    pub fn new(records: Vec<ScriptRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn push(&self, record: ScriptRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl ScriptSource for SharedSource {
    async fn fetch_enabled_scripts(&self) -> Result<Vec<ScriptRecord>, BoxError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let records = self.records.lock().unwrap().clone();
        Ok(records.into_iter().filter(|r| r.enabled).collect())
    }

    async fn is_provisioned(&self) -> Result<bool, BoxError> {
        Ok(true)
    }
}

/// Runs a tiny "script language": each script name maps to an action.
#[derive(Clone, Default)]
pub struct ActionExecutor {
    pub log: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug)]
pub struct ValidationFailed(pub String);

impl std::fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: {}", self.0)
    }
}

impl std::error::Error for ValidationFailed {}

impl ActionExecutor {
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl DocEventExecutor<Invoice> for ActionExecutor {
    async fn execute_doc_event(&self, script: &str, doc: &mut Invoice) -> Result<(), BoxError> {
        self.log.lock().unwrap().push(script.to_owned());
        match script {
            "set-status" => {
                doc.fields.insert("status".into(), "Draft".into());
                Ok(())
            }
            "double-total" => {
                doc.total *= 2;
                Ok(())
            }
            "reject-negative" if doc.total < 0 => {
                Err(Box::new(ValidationFailed("total must be positive".into())))
            }
            _ => Ok(()),
        }
    }
}

impl MethodExecutor for ActionExecutor {
    async fn execute_api_method(&self, script: &str) -> Result<(), BoxError> {
        self.log.lock().unwrap().push(script.to_owned());
        if script == "explode" {
            return Err("api script raised".into());
        }
        Ok(())
    }

    async fn execute_permission_query(
        &self,
        script: &str,
        user: Option<&str>,
    ) -> Result<Option<String>, BoxError> {
        self.log.lock().unwrap().push(script.to_owned());
        Ok(user.map(|user| format!("`owner` = '{user}'")))
    }
}

pub fn invoice_scripts() -> Vec<ScriptRecord> {
    vec![
        ScriptRecord::doc_event("set-status", "Sales Invoice", LifecycleEvent::BeforeInsert),
        ScriptRecord::doc_event("double-total", "Sales Invoice", LifecycleEvent::Validate),
        ScriptRecord::doc_event("reject-negative", "Sales Invoice", LifecycleEvent::Validate),
        ScriptRecord::doc_event("audit", "Sales Invoice", LifecycleEvent::Validate),
        ScriptRecord::api("ping", "ping"),
        ScriptRecord::api("explode", "explode"),
        ScriptRecord::permission_query("own-invoices", "Sales Invoice"),
    ]
}
