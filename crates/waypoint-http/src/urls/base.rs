//! The base of every URL: origin, web root, and index script.

use waypoint_core::RequestSettings;

/// Base URL components of the current request.
///
/// The web root is normalized to start and end with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    scheme: String,
    host: String,
    port: Option<u16>,
    web_root: String,
    index_script: String,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::from_settings(&RequestSettings::default())
    }
}

impl BaseUrl {
    /// Creates a base URL.
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: Option<u16>,
        web_root: &str,
        index_script: impl Into<String>,
    ) -> Self {
        let trimmed = web_root.trim_matches('/');
        let web_root = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };

        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            web_root,
            index_script: index_script.into().trim_matches('/').to_string(),
        }
    }

    /// Creates a base URL from [`RequestSettings`].
    pub fn from_settings(settings: &RequestSettings) -> Self {
        Self::new(
            settings.scheme.clone(),
            settings.host.clone(),
            settings.port,
            &settings.web_root,
            settings.index_script.clone(),
        )
    }

    /// Returns the normalized web root (e.g. `"/app/"`).
    pub fn web_root(&self) -> &str {
        &self.web_root
    }

    /// Returns the index script name.
    pub fn index_script(&self) -> &str {
        &self.index_script
    }

    /// Returns `scheme://host[:port]`, omitting the scheme's default port.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_http::urls::base::BaseUrl;
    ///
    /// let base = BaseUrl::new("https", "example.com", Some(443), "/", "index.php");
    /// assert_eq!(base.origin(), "https://example.com");
    ///
    /// let base = BaseUrl::new("http", "example.com", Some(8080), "/", "index.php");
    /// assert_eq!(base.origin(), "http://example.com:8080");
    /// ```
    pub fn origin(&self) -> String {
        let default_port = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        match self.port {
            Some(port) if Some(port) != default_port => {
                format!("{}://{}:{port}", self.scheme, self.host)
            }
            _ => format!("{}://{}", self.scheme, self.host),
        }
    }

    /// Builds the prefix generated URLs start with:
    /// `[origin][webRoot][indexScript]`, plus a trailing `/` after the
    /// index script in rewrite mode.
    pub fn prefix(&self, complete: bool, show_index: bool, rewrite: bool) -> String {
        let mut prefix = if complete { self.origin() } else { String::new() };
        prefix.push_str(&self.web_root);
        if show_index && !self.index_script.is_empty() {
            prefix.push_str(&self.index_script);
            if rewrite {
                prefix.push('/');
            }
        }
        prefix
    }

    /// Strips the web root and a leading index-script segment from a
    /// collapsed path, returning the remainder without a leading `/`.
    ///
    /// A trailing `/` is preserved; rewrite parsing uses it to tell
    /// directory-terminated paths apart.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_http::urls::base::BaseUrl;
    ///
    /// let base = BaseUrl::new("http", "localhost", None, "/app", "index.php");
    /// assert_eq!(base.strip("/app/index.php/blog/list"), "blog/list");
    /// assert_eq!(base.strip("/app/blog/"), "blog/");
    /// assert_eq!(base.strip("/app"), "");
    /// ```
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        let rest = if let Some(rest) = path.strip_prefix(self.web_root.as_str()) {
            rest
        } else if path.len() + 1 == self.web_root.len() && self.web_root.starts_with(path) {
            ""
        } else {
            path.trim_start_matches('/')
        };

        if self.index_script.is_empty() {
            return rest;
        }
        match rest.strip_prefix(self.index_script.as_str()) {
            Some("") => "",
            Some(after) if after.starts_with('/') => after.trim_start_matches('/'),
            _ => rest,
        }
    }
}
