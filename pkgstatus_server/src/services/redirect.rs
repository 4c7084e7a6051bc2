//! Redirects from `/{server}/{uri}` to the build farm node's own web UI.
//!
//! A frontend proxy (e.g. nginx) can be placed in front of the nodes by
//! setting a proxy prefix. Without one, clients are sent straight to the
//! node's registered host.

use std::time::Duration;

use crate::error::Error;
use crate::services::bounded;
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectMode {
    /// Redirect to `{prefix}/{server}/{uri}`; the proxy owns server validity.
    Proxy { prefix: String },
    /// Redirect to `http://{host}/{uri}` for a registered server.
    Direct,
}

impl RedirectMode {
    pub fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            Some(prefix) => RedirectMode::Proxy {
                prefix: prefix.to_string(),
            },
            None => RedirectMode::Direct,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RedirectMode::Proxy { .. } => "proxy",
            RedirectMode::Direct => "direct",
        }
    }
}

/// A request for `/{server}/{uri}`.
///
/// `server` is the decoded registry identifier. `segment` and `uri` are the
/// path text exactly as the client encoded it, so escapes such as `%3F` or
/// `%20` survive into the redirect target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRequest<'a> {
    pub server: &'a str,
    pub segment: &'a str,
    pub uri: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> NodeRequest<'a> {
    /// Split a raw request path `/{segment}/{uri}`.
    pub fn from_raw_path(server: &'a str, path: &'a str, query: Option<&'a str>) -> Self {
        let rest = path.strip_prefix('/').unwrap_or(path);
        let (segment, uri) = rest.split_once('/').unwrap_or((rest, ""));
        Self {
            server,
            segment,
            uri,
            query,
        }
    }
}

/// Resolve the redirect target for a node request, carrying the sub-path
/// and the raw query string over unchanged.
pub async fn resolve_target(
    store: &dyn RecordStore,
    timeout: Duration,
    mode: &RedirectMode,
    request: &NodeRequest<'_>,
) -> Result<String, Error> {
    let uri = request.uri;
    let base = match mode {
        RedirectMode::Proxy { prefix } => format!("{prefix}/{}/{uri}", request.segment),
        RedirectMode::Direct => {
            let record = bounded("find_server", timeout, store.find_server(request.server))
                .await?
                .ok_or_else(|| Error::ServerNotFound(request.server.to_string()))?;
            format!("http://{}/{uri}", record.host)
        }
    };

    let target = match request.query {
        Some(query) if !query.is_empty() => format!("{base}?{query}"),
        _ => base,
    };

    crate::metrics::redirect_issued(mode.label());
    tracing::debug!(
        server = request.server,
        mode = mode.label(),
        %target,
        "Redirecting to build node"
    );
    Ok(target)
}
