//! Script records as read from storage.

use crate::{error::UnknownVariant, event::LifecycleEvent};
use std::{fmt, str::FromStr};

/// What kind of trigger a script answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptType {
    /// Runs on a document lifecycle event.
    #[cfg_attr(feature = "serde", serde(rename = "DocType Event"))]
    DocTypeEvent,
    /// Supplies extra query conditions for permission checks.
    #[cfg_attr(feature = "serde", serde(rename = "Permission Query"))]
    PermissionQuery,
    /// Answers an inbound API call.
    #[cfg_attr(feature = "serde", serde(rename = "API"))]
    ApiMethod,
}

impl ScriptType {
    /// The name this type is stored under.
    pub const fn as_str(self) -> &'static str {
        match self {
            ScriptType::DocTypeEvent => "DocType Event",
            ScriptType::PermissionQuery => "Permission Query",
            ScriptType::ApiMethod => "API",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DocType Event" => Ok(ScriptType::DocTypeEvent),
            "Permission Query" => Ok(ScriptType::PermissionQuery),
            "API" => Ok(ScriptType::ApiMethod),
            _ => Err(UnknownVariant {
                kind: "script type",
                value: s.to_owned(),
            }),
        }
    }
}

/// A user-authored script as seen by the routing layer.
///
/// Only the routing-relevant columns are carried; the script body stays with
/// the executor. Which optional fields are meaningful depends on
/// [`ScriptType`]:
///
/// | Type | `reference_doctype` | `doctype_event` | `api_method` |
/// |------|---------------------|-----------------|--------------|
/// | `DocTypeEvent` | required | required | - |
/// | `PermissionQuery` | required | - | - |
/// | `ApiMethod` | - | - | required |
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptRecord {
    /// Unique script identifier.
    pub name: String,
    /// Trigger kind. Unrecognized stored types read as `ApiMethod`.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::script_type"))]
    pub script_type: ScriptType,
    /// Document type the script is attached to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference_doctype: Option<String>,
    /// Lifecycle event, for `DocTypeEvent` scripts. Unrecognized stored
    /// labels read as `None`, which keeps the record out of routing.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::doctype_event")
    )]
    pub doctype_event: Option<LifecycleEvent>,
    /// Method key, for API scripts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub api_method: Option<String>,
    /// Disabled scripts never enter a routing table.
    pub enabled: bool,
}

impl ScriptRecord {
    /// A script run on `event` for documents of type `doctype`.
    pub fn doc_event(
        name: impl Into<String>,
        doctype: impl Into<String>,
        event: LifecycleEvent,
    ) -> Self {
        Self {
            name: name.into(),
            script_type: ScriptType::DocTypeEvent,
            reference_doctype: Some(doctype.into()),
            doctype_event: Some(event),
            api_method: None,
            enabled: true,
        }
    }

    /// A script answering the API method `method`.
    pub fn api(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script_type: ScriptType::ApiMethod,
            reference_doctype: None,
            doctype_event: None,
            api_method: Some(method.into()),
            enabled: true,
        }
    }

    /// A permission query script for documents of type `doctype`.
    pub fn permission_query(name: impl Into<String>, doctype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script_type: ScriptType::PermissionQuery,
            reference_doctype: Some(doctype.into()),
            doctype_event: None,
            api_method: None,
            enabled: true,
        }
    }

    /// Mark the record as disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Field readers that degrade unknown stored values instead of failing the
/// whole batch of records.
#[cfg(feature = "serde")]
mod lenient {
    use super::{LifecycleEvent, ScriptType};
    use serde::{Deserialize, Deserializer};

    pub(super) fn script_type<'de, D>(deserializer: D) -> Result<ScriptType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or(ScriptType::ApiMethod))
    }

    pub(super) fn doctype_event<'de, D>(deserializer: D) -> Result<Option<LifecycleEvent>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.and_then(|value| value.parse().ok()))
    }
}
