//! Translation of script failures into user-facing errors.

use scriptmap_core::{BoxError, ExecutionContext, LinkBuilder, StatusHint, UserFacingError};

/// Title of every translated script failure.
pub const SCRIPT_ERROR_TITLE: &str = "Server Script Error";

/// Record kind that scripts are stored as, used when linking to them.
pub const SCRIPT_KIND: &str = "Server Script";

/// Links to the desk form of a record: `<a href="/app/{kind-slug}/{id}">{id}</a>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormLink;

impl LinkBuilder for FormLink {
    fn link(&self, kind: &str, identifier: &str) -> String {
        let slug = kind.to_lowercase().replace(' ', "-");
        format!(r#"<a href="/app/{slug}/{identifier}">{identifier}</a>"#)
    }
}

/// Turns a script failure into a [`UserFacingError`].
///
/// Failures raised while serving an inbound request get
/// [`StatusHint::ExpectationFailed`]: the request was fine, the user-authored
/// script was not. Other failures carry no hint.
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator<L = FormLink> {
    links: L,
}

impl ErrorTranslator<FormLink> {
    /// Create a translator that links with [`FormLink`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: LinkBuilder> ErrorTranslator<L> {
    /// Create a translator with a custom link builder.
    pub fn with_links(links: L) -> Self {
        Self { links }
    }

    /// Translate `failure` raised by `script`.
    pub fn translate(
        &self,
        script: &str,
        failure: BoxError,
        ctx: &ExecutionContext,
    ) -> UserFacingError {
        let link = self.links.link(SCRIPT_KIND, script);
        let message = format!(
            "Error executing Server Script {link}. Open Browser Console to see traceback."
        );
        let status_hint = ctx
            .is_request_bound()
            .then_some(StatusHint::ExpectationFailed);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            script,
            error = %failure,
            request = ctx.is_request_bound(),
            "server script failed"
        );

        UserFacingError::new(SCRIPT_ERROR_TITLE, message, script, status_hint, failure)
    }
}
