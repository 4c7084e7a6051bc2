//! Server configuration — loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct PkgstatusConfig {
    /// Reverse-proxy prefix for node redirects. Unset means redirect
    /// straight to the node's registered host.
    pub proxy_server: Option<String>,
    /// Upper bound on each record store round-trip.
    pub store_timeout: Duration,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Default for PkgstatusConfig {
    fn default() -> Self {
        Self {
            proxy_server: None,
            store_timeout: Duration::from_secs(10),
            static_dir: PathBuf::from("public/static"),
        }
    }
}

impl PkgstatusConfig {
    pub fn from_env() -> Self {
        let proxy_server = std::env::var("PKGSTATUS_PROXY_SERVER")
            .ok()
            .and_then(|s| normalize_prefix(&s));
        let store_timeout = std::env::var("PKGSTATUS_STORE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));
        let static_dir = std::env::var("PKGSTATUS_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/static"));

        match &proxy_server {
            Some(prefix) => tracing::info!(%prefix, "Redirecting to nodes through proxy"),
            None => tracing::info!("PKGSTATUS_PROXY_SERVER not set -- redirecting to node hosts"),
        }

        Self {
            proxy_server,
            store_timeout,
            static_dir,
        }
    }
}

/// Trim a trailing `/` so `{prefix}/{server}/` never doubles the separator.
/// The configured value is otherwise used as given.
fn normalize_prefix(prefix: &str) -> Option<String> {
    let prefix = prefix.trim().trim_end_matches('/');
    (!prefix.is_empty()).then(|| prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_trailing_slash_is_trimmed_to_avoid_double_slash() {
        assert_eq!(
            normalize_prefix("https://hub.example/"),
            Some("https://hub.example".to_string())
        );
        assert_eq!(
            normalize_prefix("https://hub.example"),
            Some("https://hub.example".to_string())
        );
    }

    #[test]
    fn blank_prefix_means_direct_mode() {
        assert_eq!(normalize_prefix(""), None);
        assert_eq!(normalize_prefix("  "), None);
    }
}
