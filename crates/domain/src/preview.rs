//! Preview/draft session primitives.
//!
//! The token format is an external Kuroco contract inferred from observed
//! values (`prefix_draftId_suffix`); all parsing lives here so nothing else
//! in the tree indexes into the token by convention.

/// Cookie the preview token travels in.
pub const PREVIEW_COOKIE: &str = "previewToken";

/// Preview cookie lifetime: 24 hours.
pub const PREVIEW_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24;

/// An opaque Kuroco preview token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewToken(String);

impl PreviewToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Draft id embedded in the token: the second `_`-delimited segment.
    ///
    /// `None` when the token has no second segment or it is empty, rather
    /// than silently yielding a wrong slice.
    pub fn draft_id(&self) -> Option<&str> {
        self.0.split('_').nth(1).filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for PreviewToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
