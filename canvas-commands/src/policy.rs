//! Host-side policies: script-message origin filtering and deep-link
//! interception.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use url::Url;

/// Default custom URL scheme reserved for host deep links.
pub const DEFAULT_DEEP_LINK_SCHEME: &str = "saorsa";

/// Accepts script messages only from known bundled local pages.
///
/// A message is accepted when the sending page URL is a `file://` URL whose
/// canonicalized path is one of the registered bundle pages. Messages from
/// any other origin, including remote pages loaded via `canvas.navigate`,
/// are dropped.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed: BTreeSet<PathBuf>,
}

impl OriginPolicy {
    /// Create an empty policy. An empty policy rejects every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundled page.
    ///
    /// The path is canonicalized so that symlinks and `..` segments in the
    /// sender URL cannot dodge the comparison. A path that does not resolve
    /// is skipped: a page that does not exist can never send messages.
    pub fn allow_page(&mut self, path: &Path) {
        match path.canonicalize() {
            Ok(canonical) => {
                self.allowed.insert(canonical);
            }
            Err(e) => {
                tracing::warn!("Ignoring unresolvable bundle page {}: {e}", path.display());
            }
        }
    }

    /// Number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Whether no pages are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Decide whether a message from the page at `page_url` is accepted.
    #[must_use]
    pub fn allows(&self, page_url: &str) -> bool {
        let Ok(url) = Url::parse(page_url) else {
            return false;
        };
        if url.scheme() != "file" {
            return false;
        }
        let Ok(path) = url.to_file_path() else {
            return false;
        };
        match path.canonicalize() {
            Ok(canonical) => self.allowed.contains(&canonical),
            Err(_) => false,
        }
    }
}

/// Outcome of a navigation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Load the URL in the surface.
    Load,
    /// Cancel the load and hand the URL to the host deep-link callback.
    Intercept(Url),
}

/// Decides whether a navigation is loaded or intercepted as a deep link.
///
/// Exactly one custom scheme is reserved; everything else loads normally.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    scheme: String,
}

impl NavigationPolicy {
    /// Create a policy intercepting the given custom scheme.
    #[must_use]
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
        }
    }

    /// The intercepted scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Decide what to do with a navigation to `url`.
    ///
    /// Only an exact scheme match is intercepted. Unparseable URLs load
    /// unchanged; the webview rejects them itself.
    #[must_use]
    pub fn decide(&self, url: &str) -> NavigationDecision {
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == self.scheme => NavigationDecision::Intercept(parsed),
            _ => NavigationDecision::Load,
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DEEP_LINK_SCHEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn page_url(path: &Path) -> String {
        Url::from_file_path(path.canonicalize().expect("canonical"))
            .expect("file url")
            .to_string()
    }

    #[test]
    fn test_registered_page_is_allowed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = dir.path().join("scaffold.html");
        fs::write(&page, "<html></html>").expect("write");

        let mut policy = OriginPolicy::new();
        policy.allow_page(&page);

        assert!(policy.allows(&page_url(&page)));
    }

    #[test]
    fn test_other_local_file_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = dir.path().join("scaffold.html");
        let other = dir.path().join("other.html");
        fs::write(&page, "<html></html>").expect("write");
        fs::write(&other, "<html></html>").expect("write");

        let mut policy = OriginPolicy::new();
        policy.allow_page(&page);

        assert!(!policy.allows(&page_url(&other)));
    }

    #[test]
    fn test_remote_origin_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = dir.path().join("scaffold.html");
        fs::write(&page, "<html></html>").expect("write");

        let mut policy = OriginPolicy::new();
        policy.allow_page(&page);

        assert!(!policy.allows("https://example.com/scaffold.html"));
        assert!(!policy.allows("data:text/html,<h1>hi</h1>"));
        assert!(!policy.allows("not a url"));
    }

    #[test]
    fn test_dot_segments_cannot_dodge_canonicalization() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sub = dir.path().join("pages");
        fs::create_dir(&sub).expect("mkdir");
        let page = sub.join("scaffold.html");
        fs::write(&page, "<html></html>").expect("write");

        let mut policy = OriginPolicy::new();
        policy.allow_page(&page);

        // Same file reached through a dot segment still matches.
        let dodged = dir.path().join("pages/../pages/scaffold.html");
        let url = Url::from_file_path(&dodged).expect("file url");
        assert!(policy.allows(url.as_str()));
    }

    #[test]
    fn test_empty_policy_rejects_everything() {
        let policy = OriginPolicy::new();
        assert!(!policy.allows("file:///tmp/anything.html"));
    }

    #[test]
    fn test_deep_link_scheme_intercepted() {
        let policy = NavigationPolicy::default();
        let decision = policy.decide("saorsa://open/settings");
        match decision {
            NavigationDecision::Intercept(url) => assert_eq!(url.scheme(), "saorsa"),
            NavigationDecision::Load => panic!("expected interception"),
        }
    }

    #[test]
    fn test_ordinary_urls_load() {
        let policy = NavigationPolicy::default();
        assert_eq!(
            policy.decide("https://example.com"),
            NavigationDecision::Load
        );
        assert_eq!(
            policy.decide("file:///opt/canvas/bundle/scaffold.html"),
            NavigationDecision::Load
        );
        assert_eq!(policy.decide("not a url"), NavigationDecision::Load);
    }

    #[test]
    fn test_custom_scheme_is_lowercased() {
        let policy = NavigationPolicy::new("MyApp");
        assert_eq!(policy.scheme(), "myapp");
        assert!(matches!(
            policy.decide("myapp://hello"),
            NavigationDecision::Intercept(_)
        ));
    }
}
