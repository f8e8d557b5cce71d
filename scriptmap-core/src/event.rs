//! Document lifecycle events.
//!
//! Each event has an internal name (what the document layer fires, e.g.
//! `validate`) and a label (what script authors pick, e.g. `Before Save`).
//! The label is the routing key. The mapping is fixed.

use crate::error::UnknownVariant;
use std::{fmt, str::FromStr};

/// A named point in a document's life at which scripts may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleEvent {
    /// `before_insert`, labelled "Before Insert".
    #[cfg_attr(feature = "serde", serde(rename = "Before Insert"))]
    BeforeInsert,
    /// `after_insert`, labelled "After Insert".
    #[cfg_attr(feature = "serde", serde(rename = "After Insert"))]
    AfterInsert,
    /// `before_validate`, labelled "Before Validate".
    #[cfg_attr(feature = "serde", serde(rename = "Before Validate"))]
    BeforeValidate,
    /// `validate`, labelled "Before Save".
    #[cfg_attr(feature = "serde", serde(rename = "Before Save"))]
    Validate,
    /// `on_update`, labelled "After Save".
    #[cfg_attr(feature = "serde", serde(rename = "After Save"))]
    OnUpdate,
    /// `before_submit`, labelled "Before Submit".
    #[cfg_attr(feature = "serde", serde(rename = "Before Submit"))]
    BeforeSubmit,
    /// `on_submit`, labelled "After Submit".
    #[cfg_attr(feature = "serde", serde(rename = "After Submit"))]
    OnSubmit,
    /// `before_cancel`, labelled "Before Cancel".
    #[cfg_attr(feature = "serde", serde(rename = "Before Cancel"))]
    BeforeCancel,
    /// `on_cancel`, labelled "After Cancel".
    #[cfg_attr(feature = "serde", serde(rename = "After Cancel"))]
    OnCancel,
    /// `on_trash`, labelled "Before Delete".
    #[cfg_attr(feature = "serde", serde(rename = "Before Delete"))]
    OnTrash,
    /// `after_delete`, labelled "After Delete".
    #[cfg_attr(feature = "serde", serde(rename = "After Delete"))]
    AfterDelete,
    /// `before_update_after_submit`, labelled "Before Save (Submitted Document)".
    #[cfg_attr(feature = "serde", serde(rename = "Before Save (Submitted Document)"))]
    BeforeUpdateAfterSubmit,
    /// `on_update_after_submit`, labelled "After Save (Submitted Document)".
    #[cfg_attr(feature = "serde", serde(rename = "After Save (Submitted Document)"))]
    OnUpdateAfterSubmit,
}

impl LifecycleEvent {
    /// Every recognized event, in document life order.
    pub const ALL: [LifecycleEvent; 13] = [
        LifecycleEvent::BeforeInsert,
        LifecycleEvent::AfterInsert,
        LifecycleEvent::BeforeValidate,
        LifecycleEvent::Validate,
        LifecycleEvent::OnUpdate,
        LifecycleEvent::BeforeSubmit,
        LifecycleEvent::OnSubmit,
        LifecycleEvent::BeforeCancel,
        LifecycleEvent::OnCancel,
        LifecycleEvent::OnTrash,
        LifecycleEvent::AfterDelete,
        LifecycleEvent::BeforeUpdateAfterSubmit,
        LifecycleEvent::OnUpdateAfterSubmit,
    ];

    /// The internal name fired by the document layer.
    pub const fn name(self) -> &'static str {
        match self {
            LifecycleEvent::BeforeInsert => "before_insert",
            LifecycleEvent::AfterInsert => "after_insert",
            LifecycleEvent::BeforeValidate => "before_validate",
            LifecycleEvent::Validate => "validate",
            LifecycleEvent::OnUpdate => "on_update",
            LifecycleEvent::BeforeSubmit => "before_submit",
            LifecycleEvent::OnSubmit => "on_submit",
            LifecycleEvent::BeforeCancel => "before_cancel",
            LifecycleEvent::OnCancel => "on_cancel",
            LifecycleEvent::OnTrash => "on_trash",
            LifecycleEvent::AfterDelete => "after_delete",
            LifecycleEvent::BeforeUpdateAfterSubmit => "before_update_after_submit",
            LifecycleEvent::OnUpdateAfterSubmit => "on_update_after_submit",
        }
    }

    /// The human-readable label used as the routing key.
    pub const fn label(self) -> &'static str {
        match self {
            LifecycleEvent::BeforeInsert => "Before Insert",
            LifecycleEvent::AfterInsert => "After Insert",
            LifecycleEvent::BeforeValidate => "Before Validate",
            LifecycleEvent::Validate => "Before Save",
            LifecycleEvent::OnUpdate => "After Save",
            LifecycleEvent::BeforeSubmit => "Before Submit",
            LifecycleEvent::OnSubmit => "After Submit",
            LifecycleEvent::BeforeCancel => "Before Cancel",
            LifecycleEvent::OnCancel => "After Cancel",
            LifecycleEvent::OnTrash => "Before Delete",
            LifecycleEvent::AfterDelete => "After Delete",
            LifecycleEvent::BeforeUpdateAfterSubmit => "Before Save (Submitted Document)",
            LifecycleEvent::OnUpdateAfterSubmit => "After Save (Submitted Document)",
        }
    }

    /// Look up an event by its internal name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.name() == name)
    }

    /// Look up an event by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.label() == label)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses either the internal name or the label.
impl FromStr for LifecycleEvent {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| UnknownVariant {
                kind: "lifecycle event",
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mapping_is_one_to_one() {
        let names: HashSet<_> = LifecycleEvent::ALL.iter().map(|e| e.name()).collect();
        let labels: HashSet<_> = LifecycleEvent::ALL.iter().map(|e| e.label()).collect();
        assert_eq!(names.len(), LifecycleEvent::ALL.len());
        assert_eq!(labels.len(), LifecycleEvent::ALL.len());

        for event in LifecycleEvent::ALL {
            assert_eq!(LifecycleEvent::from_name(event.name()), Some(event));
            assert_eq!(LifecycleEvent::from_label(event.label()), Some(event));
        }
    }

    #[test]
    fn test_validate_maps_to_before_save() {
        assert_eq!(LifecycleEvent::Validate.label(), "Before Save");
        assert_eq!(LifecycleEvent::OnTrash.label(), "Before Delete");
        assert_eq!(
            "on_update_after_submit".parse::<LifecycleEvent>(),
            Ok(LifecycleEvent::OnUpdateAfterSubmit)
        );
    }

    #[test]
    fn test_unknown_event() {
        assert_eq!(LifecycleEvent::from_name("on_change"), None);
        let err = "on_change".parse::<LifecycleEvent>().unwrap_err();
        assert_eq!(err.to_string(), "unknown lifecycle event: on_change");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&LifecycleEvent::Validate).unwrap();
        assert_eq!(json, "\"Before Save\"");
        let back: LifecycleEvent = serde_json::from_str("\"After Delete\"").unwrap();
        assert_eq!(back, LifecycleEvent::AfterDelete);
    }
}
