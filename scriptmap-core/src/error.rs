//! Error types for scriptmap.
//!
//! This module provides a small error hierarchy using `thiserror`:
//!
//! - [`ScriptMapError`] - Top-level error returned by every dispatch operation
//! - [`UserFacingError`] - A translated script failure, ready to be shown to a user
//! - [`UnknownVariant`] - Parse failure for the fixed enumerations

use thiserror::Error;

/// A boxed error type for dynamic error handling.
///
/// Every collaborator capability (record source, script executor) fails with
/// this type so the concrete failure survives translation untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all scriptmap operations.
#[derive(Error, Debug)]
pub enum ScriptMapError {
    /// The script record source failed. Passed through unmodified.
    #[error(transparent)]
    Storage(BoxError),

    /// A user-authored script failed while handling a trigger.
    #[error(transparent)]
    Script(#[from] UserFacingError),
}

impl ScriptMapError {
    /// Returns the translated script failure, if this is one.
    pub fn as_script(&self) -> Option<&UserFacingError> {
        match self {
            ScriptMapError::Script(err) => Some(err),
            ScriptMapError::Storage(_) => None,
        }
    }
}

/// Transport status hint attached to a translated script failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusHint {
    /// The request was well formed but user-authored logic failed (417).
    ExpectationFailed,
    /// A platform fault (500).
    InternalServerError,
}

impl StatusHint {
    /// The numeric HTTP status code for this hint.
    pub const fn code(self) -> u16 {
        match self {
            StatusHint::ExpectationFailed => 417,
            StatusHint::InternalServerError => 500,
        }
    }
}

/// A script execution failure dressed for presentation.
///
/// Carries a title, a message referencing the failing script and an optional
/// [`StatusHint`]. The original failure is kept as the error source and can be
/// recovered with [`UserFacingError::downcast_ref`]. Values are immutable once
/// constructed.
#[derive(Error, Debug)]
#[error("{title}: {message}")]
pub struct UserFacingError {
    title: String,
    message: String,
    script: String,
    status_hint: Option<StatusHint>,
    #[source]
    source: BoxError,
}

impl UserFacingError {
    /// Create a new user-facing error.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        script: impl Into<String>,
        status_hint: Option<StatusHint>,
        source: BoxError,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            script: script.into(),
            status_hint,
            source,
        }
    }

    /// The stable title identifying the kind of failure.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The message shown to the user, including a reference to the script.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Identifier of the script that failed.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Transport status hint, set only for request-bound invocations.
    pub fn status_hint(&self) -> Option<StatusHint> {
        self.status_hint
    }

    /// Borrow the original failure.
    pub fn original(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Attempt to view the original failure as a concrete type.
    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }

    /// Consume the error and return the original failure.
    pub fn into_original(self) -> BoxError {
        self.source
    }
}

/// A string did not name any variant of a fixed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}
