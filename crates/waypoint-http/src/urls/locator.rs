//! Symbolic route locators.
//!
//! A locator names a route without spelling out its URL:
//! `[path/]controller:action[.extension][#fragment]`, e.g. `"admin/user:edit.json#form"`.

use std::fmt;
use std::str::FromStr;

use waypoint_core::{RouterError, RouterResult};

/// A parsed locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Controller path, `/`-separated for nested controllers.
    pub controller: String,
    /// Action name.
    pub action: String,
    /// Extension without the leading dot.
    pub extension: Option<String>,
    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
}

impl Locator {
    /// Parses a locator string.
    ///
    /// The first `#` splits off the fragment, then the first `.` splits off
    /// the extension, then the first `:` splits controller from action. When
    /// the locator names no extension, `default_extension` is used.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidLocator`] if there is no `:` or either
    /// side of it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_http::urls::locator::Locator;
    ///
    /// let loc = Locator::parse("admin/user:edit.json#form", None).unwrap();
    /// assert_eq!(loc.controller, "admin/user");
    /// assert_eq!(loc.action, "edit");
    /// assert_eq!(loc.extension.as_deref(), Some("json"));
    /// assert_eq!(loc.fragment.as_deref(), Some("form"));
    ///
    /// let loc = Locator::parse("blog:list", Some("html")).unwrap();
    /// assert_eq!(loc.extension.as_deref(), Some("html"));
    ///
    /// assert!(Locator::parse("blog", None).is_err());
    /// ```
    pub fn parse(locator: &str, default_extension: Option<&str>) -> RouterResult<Self> {
        let (rest, fragment) = match locator.split_once('#') {
            Some((rest, fragment)) => (rest, non_empty(fragment)),
            None => (locator, None),
        };

        let (rest, extension) = match rest.split_once('.') {
            Some((rest, extension)) => (rest, non_empty(extension)),
            None => (rest, None),
        };
        let extension = extension.or_else(|| default_extension.and_then(non_empty));

        let (controller, action) = rest
            .split_once(':')
            .ok_or_else(|| RouterError::InvalidLocator(format!("missing ':' in '{locator}'")))?;

        let controller = controller.trim_matches('/');
        if controller.is_empty() || action.is_empty() {
            return Err(RouterError::InvalidLocator(format!(
                "empty controller or action in '{locator}'"
            )));
        }

        Ok(Self {
            controller: controller.to_string(),
            action: action.to_string(),
            extension,
            fragment,
        })
    }
}

impl FromStr for Locator {
    type Err = RouterError;

    /// Parses a locator with no default extension.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.controller, self.action)?;
        if let Some(ext) = &self.extension {
            write!(f, ".{ext}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let loc = Locator::parse("blog:archive", None).unwrap();
        assert_eq!(loc.controller, "blog");
        assert_eq!(loc.action, "archive");
        assert_eq!(loc.extension, None);
        assert_eq!(loc.fragment, None);
    }

    #[test]
    fn test_parse_nested_controller() {
        let loc = Locator::parse("admin/user:edit", None).unwrap();
        assert_eq!(loc.controller, "admin/user");
        assert_eq!(loc.action, "edit");
    }

    #[test]
    fn test_parse_leading_slash_trimmed() {
        let loc = Locator::parse("/admin/user:edit", None).unwrap();
        assert_eq!(loc.controller, "admin/user");
    }

    #[test]
    fn test_parse_fragment_split_first() {
        // The '.' inside the fragment must not be read as an extension
        let loc = Locator::parse("blog:show#section.2", None).unwrap();
        assert_eq!(loc.action, "show");
        assert_eq!(loc.extension, None);
        assert_eq!(loc.fragment.as_deref(), Some("section.2"));
    }

    #[test]
    fn test_parse_explicit_extension_beats_default() {
        let loc = Locator::parse("blog:feed.xml", Some("html")).unwrap();
        assert_eq!(loc.extension.as_deref(), Some("xml"));
    }

    #[test]
    fn test_parse_empty_default_extension_is_none() {
        let loc = Locator::parse("blog:feed", Some("")).unwrap();
        assert_eq!(loc.extension, None);
    }

    #[test]
    fn test_parse_only_first_colon_splits() {
        let loc = Locator::parse("blog:a:b", None).unwrap();
        assert_eq!(loc.controller, "blog");
        assert_eq!(loc.action, "a:b");
    }

    #[test]
    fn test_parse_missing_colon() {
        let err = Locator::parse("blog.html", None).unwrap_err();
        assert!(matches!(err, RouterError::InvalidLocator(_)));
    }

    #[test]
    fn test_parse_empty_sides() {
        assert!(Locator::parse(":index", None).is_err());
        assert!(Locator::parse("blog:", None).is_err());
        assert!(Locator::parse("", None).is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let loc: Locator = "admin/user:edit.json#top".parse().unwrap();
        assert_eq!(loc.to_string(), "admin/user:edit.json#top");
    }
}
