//! Canonical-URL policy.
//!
//! One total function decides, per path prefix, which query parameters a
//! page's canonical URL retains. The middleware in `app` applies it on
//! every page request and publishes the result via the `x-canonical-url`
//! header; metadata consumers fall back to the configured site origin when
//! the header is absent.

/// Header carrying the canonical absolute URL to downstream consumers.
pub const CANONICAL_HEADER: &str = "x-canonical-url";

/// Non-`utm_` tracking keys stripped under the default policy.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "msclkid", "yclid"];

/// Parameters a sample-page canonical URL keeps.
const SAMPLE_PAGES_ALLOW: &[&str] = &["page", "sort", "category", "test"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// Retain only the listed keys.
    AllowList,
    /// Retain everything except the listed keys (and the `utm_` family).
    DenyList,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryPolicy {
    pub mode: PolicyMode,
    pub keys: &'static [&'static str],
}

impl QueryPolicy {
    pub fn retains(&self, key: &str) -> bool {
        match self.mode {
            PolicyMode::AllowList => self.keys.contains(&key),
            PolicyMode::DenyList => !self.keys.contains(&key) && !key.starts_with("utm_"),
        }
    }
}

/// Query policy for a request path. Total: every path gets a policy.
pub fn policy_for(path: &str) -> QueryPolicy {
    if path.starts_with("/web/samplePages") {
        QueryPolicy {
            mode: PolicyMode::AllowList,
            keys: SAMPLE_PAGES_ALLOW,
        }
    } else if path == "/web" || path == "/web/" {
        // The top page declares itself without any query noise.
        QueryPolicy {
            mode: PolicyMode::AllowList,
            keys: &[],
        }
    } else {
        QueryPolicy {
            mode: PolicyMode::DenyList,
            keys: TRACKING_PARAMS,
        }
    }
}

/// Canonical absolute URL for `path` + `query` under the prefix policy.
///
/// `site_origin` must not end with a slash (see `SiteConfig::site_origin`).
pub fn canonicalize(site_origin: &str, path: &str, query: Option<&str>) -> String {
    let policy = policy_for(path);

    let mut kept = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
        if policy.retains(&key) {
            kept.append_pair(&key, &value);
            any = true;
        }
    }

    if any {
        format!("{site_origin}{path}?{}", kept.finish())
    } else {
        format!("{site_origin}{path}")
    }
}

/// Path normalization decisions made before routing, as 301 redirects.
///
/// - `/` and `/web` land on the canonical `/web/` top page.
/// - A mixed-case leading `web` segment is folded to lowercase; deeper
///   segments keep their case (routes such as `/web/samplePages` are
///   themselves camelCase).
pub fn normalization_redirect(path: &str) -> Option<String> {
    if path == "/" || path == "/web" {
        return Some("/web/".to_string());
    }

    let rest = path.strip_prefix('/')?;
    let (first, tail) = match rest.split_once('/') {
        Some((first, tail)) => (first, Some(tail)),
        None => (rest, None),
    };

    if first.eq_ignore_ascii_case("web") && first != "web" {
        return Some(match tail {
            Some(tail) => format!("/web/{tail}"),
            None => "/web/".to_string(),
        });
    }

    None
}
