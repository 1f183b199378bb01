//! Navigation target resolution.

use url::Url;

use crate::error::{ControllerError, ControllerResult};

/// Where a `canvas.navigate` command should take the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Reset to the bundled scaffold page.
    Scaffold,
    /// Load an explicit URL.
    Url(Url),
}

impl NavigationTarget {
    /// Resolve a raw `url` parameter.
    ///
    /// An absent, empty, or `/` parameter resolves to the scaffold and never
    /// produces a network load. Relative input resolves against the scaffold
    /// URL, which keeps it inside the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Navigation`] when the parameter is present
    /// but not a usable URL.
    pub fn resolve(raw: Option<&str>, scaffold: &Url) -> ControllerResult<Self> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() || raw == "/" {
            return Ok(Self::Scaffold);
        }

        match Url::parse(raw) {
            Ok(url) => Ok(Self::Url(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => scaffold
                .join(raw)
                .map(Self::Url)
                .map_err(|e| ControllerError::Navigation(format!("invalid url {raw:?}: {e}"))),
            Err(e) => Err(ControllerError::Navigation(format!(
                "invalid url {raw:?}: {e}"
            ))),
        }
    }

    /// The URL the surface should actually load.
    #[must_use]
    pub fn into_url(self, scaffold: &Url) -> Url {
        match self {
            Self::Scaffold => scaffold.clone(),
            Self::Url(url) => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaffold() -> Url {
        Url::parse("file:///opt/canvas/bundle/scaffold.html").expect("scaffold url")
    }

    #[test]
    fn test_absent_resolves_to_scaffold() {
        let target = NavigationTarget::resolve(None, &scaffold()).expect("resolve");
        assert_eq!(target, NavigationTarget::Scaffold);
    }

    #[test]
    fn test_empty_and_slash_resolve_to_scaffold() {
        for raw in ["", "   ", "/"] {
            let target = NavigationTarget::resolve(Some(raw), &scaffold()).expect("resolve");
            assert_eq!(target, NavigationTarget::Scaffold, "input {raw:?}");
        }
    }

    #[test]
    fn test_scaffold_never_becomes_network_load() {
        let target = NavigationTarget::resolve(Some("/"), &scaffold()).expect("resolve");
        let url = target.into_url(&scaffold());
        assert_eq!(url.scheme(), "file");
        assert_eq!(url, scaffold());
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let target =
            NavigationTarget::resolve(Some("https://example.com/page"), &scaffold()).expect("ok");
        assert_eq!(
            target,
            NavigationTarget::Url(Url::parse("https://example.com/page").expect("url"))
        );
    }

    #[test]
    fn test_relative_url_joins_scaffold() {
        let target = NavigationTarget::resolve(Some("help.html"), &scaffold()).expect("ok");
        let url = target.into_url(&scaffold());
        assert_eq!(url.as_str(), "file:///opt/canvas/bundle/help.html");
    }

    #[test]
    fn test_garbage_url_is_navigation_error() {
        let err = NavigationTarget::resolve(Some("http://["), &scaffold()).unwrap_err();
        assert!(matches!(err, ControllerError::Navigation(_)));
    }
}
