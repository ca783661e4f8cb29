//! Sources of per-route grammar strings.
//!
//! Rules are looked up by dot key: the controller path with `/` replaced by
//! `.`, followed by `.` and the action (`admin/user` + `edit` -> `admin.user.edit`).

use std::collections::HashMap;
use std::hash::BuildHasher;

use waypoint_core::Settings;

/// Looks up the raw grammar string for a route.
pub trait RouteRuleSource: Send + Sync {
    /// Returns the grammar string for `dot_key`, or `None` if the route has no rule.
    fn find_route_rule(&self, dot_key: &str) -> Option<String>;
}

impl<S: BuildHasher + Send + Sync> RouteRuleSource for HashMap<String, String, S> {
    fn find_route_rule(&self, dot_key: &str) -> Option<String> {
        self.get(dot_key).cloned()
    }
}

impl RouteRuleSource for Settings {
    fn find_route_rule(&self, dot_key: &str) -> Option<String> {
        self.routes.get(dot_key).cloned()
    }
}

/// Builds the rule-lookup key for a controller path and action.
///
/// # Examples
///
/// ```
/// use waypoint_http::urls::rules::dot_key;
///
/// assert_eq!(dot_key("blog", "archive"), "blog.archive");
/// assert_eq!(dot_key("admin/user", "edit"), "admin.user.edit");
/// ```
pub fn dot_key(controller: &str, action: &str) -> String {
    format!("{}.{action}", controller.replace('/', "."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_source() {
        let mut rules = HashMap::new();
        rules.insert("blog.archive".to_string(), "year".to_string());
        assert_eq!(rules.find_route_rule("blog.archive").as_deref(), Some("year"));
        assert_eq!(rules.find_route_rule("blog.index"), None);
    }

    #[test]
    fn test_settings_source() {
        let mut settings = Settings::default();
        settings
            .routes
            .insert("admin.user.edit".to_string(), r"id<\d+>".to_string());
        assert_eq!(
            settings.find_route_rule("admin.user.edit").as_deref(),
            Some(r"id<\d+>")
        );
    }

    #[test]
    fn test_dot_key_nested() {
        assert_eq!(dot_key("a/b/c", "d"), "a.b.c.d");
    }
}
