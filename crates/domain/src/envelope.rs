//! The uniform result envelope every content accessor returns.

/// Fetch outcome carrying data plus an optional error string.
///
/// Invariant: when `error` is set, `data` holds the caller-supplied
/// fallback value, never partial upstream data. `is_preview` records
/// whether a preview token was presented, independent of success.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub data: T,
    pub error: Option<String>,
    pub is_preview: bool,
}

impl<T> FetchResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            error: None,
            is_preview: false,
        }
    }

    /// A failed fetch: `data` must be the caller's fallback value.
    pub fn fallback(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
            is_preview: false,
        }
    }

    pub fn with_preview(mut self, is_preview: bool) -> Self {
        self.is_preview = is_preview;
        self
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Project the payload, preserving the error and preview flags.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchResult<U> {
        FetchResult {
            data: f(self.data),
            error: self.error,
            is_preview: self.is_preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_keeps_data_and_error_together() {
        let r: FetchResult<Vec<u32>> = FetchResult::fallback(Vec::new(), "upstream 503");

        assert!(r.is_err());
        assert!(r.data.is_empty());
        assert_eq!(r.error.as_deref(), Some("upstream 503"));
        assert!(!r.is_preview);
    }

    #[test]
    fn map_preserves_error_and_preview_flags() {
        let r = FetchResult::fallback(0u32, "boom").with_preview(true);
        let mapped = r.map(|n| n.to_string());

        assert_eq!(mapped.data, "0");
        assert_eq!(mapped.error.as_deref(), Some("boom"));
        assert!(mapped.is_preview);
    }
}
