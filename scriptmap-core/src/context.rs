//! Per-call execution context.
//!
//! The hosting service describes the situation a trigger fires in: whether the
//! site is being installed, migrated or patched, whether the call came from
//! an inbound network request, and who the acting user is.

use bitflags::bitflags;

bitflags! {
    /// Situation flags supplied by the hosting service.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u8 {
        /// The site is being installed.
        const IN_INSTALL = 1 << 0;
        /// Data migration is running.
        const IN_MIGRATE = 1 << 1;
        /// A patch is being applied; script storage may not exist yet.
        const IN_PATCH = 1 << 2;
        /// The call originated from an inbound network request.
        const IN_REQUEST = 1 << 3;
    }
}

/// The execution context of a single dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    flags: ContextFlags,
    user: Option<String>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    /// A context with no flags and no user.
    pub const fn new() -> Self {
        Self {
            flags: ContextFlags::empty(),
            user: None,
        }
    }

    /// A context for a call bound to an inbound request.
    pub const fn request() -> Self {
        Self {
            flags: ContextFlags::IN_REQUEST,
            user: None,
        }
    }

    /// Add flags.
    pub fn with_flags(mut self, flags: ContextFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the acting user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// The raw flag set.
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// The acting user, if known.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Installation or migration is in progress. Lifecycle scripts must not run.
    pub fn is_bootstrapping(&self) -> bool {
        self.flags
            .intersects(ContextFlags::IN_INSTALL | ContextFlags::IN_MIGRATE)
    }

    /// A patch is being applied.
    pub fn in_patch(&self) -> bool {
        self.flags.contains(ContextFlags::IN_PATCH)
    }

    /// The call came from an inbound network request.
    pub fn is_request_bound(&self) -> bool {
        self.flags.contains(ContextFlags::IN_REQUEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrapping_flags() {
        assert!(!ExecutionContext::new().is_bootstrapping());
        assert!(
            ExecutionContext::new()
                .with_flags(ContextFlags::IN_MIGRATE)
                .is_bootstrapping()
        );
        assert!(
            ExecutionContext::new()
                .with_flags(ContextFlags::IN_INSTALL)
                .is_bootstrapping()
        );
        assert!(
            !ExecutionContext::new()
                .with_flags(ContextFlags::IN_PATCH)
                .is_bootstrapping()
        );
    }

    #[test]
    fn test_request_context() {
        let ctx = ExecutionContext::request().with_user("alice@example.com");
        assert!(ctx.is_request_bound());
        assert!(!ctx.in_patch());
        assert_eq!(ctx.user(), Some("alice@example.com"));
    }
}
