//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client starts against a local
//! development server with zero configuration. Command-line flags are
//! applied on top by [`ClientConfig::with_overrides`].

use knife_shared::constants::DEFAULT_SERVER_URL;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the collaborator, without a trailing slash.
    /// Env: `KNIFE_SERVER_URL`
    /// Default: `http://127.0.0.1:8080`
    pub server_url: String,

    /// Session token sent as the `auth_token` cookie.
    /// Env: `KNIFE_AUTH_TOKEN`
    /// Default: none (anonymous).
    pub auth_token: Option<String>,

    /// Answer every confirmation prompt with "yes".
    /// Env: `KNIFE_ASSUME_YES` (true/false)
    /// Default: `false`
    pub assume_yes: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            auth_token: None,
            assume_yes: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("KNIFE_SERVER_URL") {
            match normalize_url(&url) {
                Some(url) => config.server_url = url,
                None => tracing::warn!(value = %url, "Invalid KNIFE_SERVER_URL, using default"),
            }
        }

        if let Some(token) = lookup("KNIFE_AUTH_TOKEN") {
            if !token.is_empty() {
                config.auth_token = Some(token);
            }
        }

        if let Some(val) = lookup("KNIFE_ASSUME_YES") {
            config.assume_yes = val != "false" && val != "0" && !val.is_empty();
        }

        config
    }

    /// Apply explicit overrides (command-line flags) on top of this config.
    pub fn with_overrides(
        mut self,
        server_url: Option<&str>,
        auth_token: Option<&str>,
        assume_yes: bool,
    ) -> Self {
        if let Some(url) = server_url {
            match normalize_url(url) {
                Some(url) => self.server_url = url,
                None => tracing::warn!(value = %url, "Invalid --server URL, keeping {}", self.server_url),
            }
        }
        if let Some(token) = auth_token {
            self.auth_token = Some(token.to_string());
        }
        self.assume_yes |= assume_yes;
        self
    }
}

/// Trim and strip the trailing slash; reject anything that is not http(s).
fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_env_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KNIFE_SERVER_URL", "https://notes.example.org/"),
            ("KNIFE_AUTH_TOKEN", "abc"),
            ("KNIFE_ASSUME_YES", "1"),
        ]));
        assert_eq!(config.server_url, "https://notes.example.org");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert!(config.assume_yes);
    }

    #[test]
    fn test_invalid_url_keeps_default() {
        let config = ClientConfig::from_lookup(lookup(&[("KNIFE_SERVER_URL", "ftp://x")]));
        assert_eq!(config.server_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default().with_overrides(Some("http://h:1/"), Some("t"), true);
        assert_eq!(config.server_url, "http://h:1");
        assert_eq!(config.auth_token.as_deref(), Some("t"));
        assert!(config.assume_yes);
    }
}
