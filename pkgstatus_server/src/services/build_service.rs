//! Build listing and build detail lookups.

use std::time::Duration;

use crate::error::Error;
use crate::models::build::Build;
use crate::models::ports::PortResults;
use crate::services::bounded;
use crate::services::origin::normalize_origins;
use crate::store::{BuildQuery, Projection, RecordStore, SortField, SortKey};

/// Listing order: newest first, then by coordinate.
pub const BUILD_LIST_ORDER: [SortKey; 5] = [
    SortKey::desc(SortField::Started),
    SortKey::asc(SortField::Setname),
    SortKey::asc(SortField::Ptname),
    SortKey::asc(SortField::Jailname),
    SortKey::asc(SortField::Buildname),
];

/// All builds matching `query`, in [`BUILD_LIST_ORDER`].
pub async fn list_builds(
    store: &dyn RecordStore,
    timeout: Duration,
    query: &BuildQuery,
    projection: &Projection,
) -> Result<Vec<Build>, Error> {
    let builds = bounded(
        "find_builds",
        timeout,
        store.find_builds(query, projection, &BUILD_LIST_ORDER),
    )
    .await?;

    crate::metrics::builds_listed(builds.len());
    tracing::debug!(?query, count = builds.len(), "Listed builds");
    Ok(builds)
}

/// A build and its port results, if any were recorded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildDetail {
    pub build: Build,
    pub ports: Option<PortResults>,
}

pub async fn get_build(
    store: &dyn RecordStore,
    timeout: Duration,
    build_id: &str,
) -> Result<BuildDetail, Error> {
    let build = bounded("find_build", timeout, store.find_build(build_id)).await?;
    crate::metrics::build_lookup(build.is_some());
    let build = build.ok_or_else(|| Error::BuildNotFound(build_id.to_string()))?;

    let ports = bounded("find_ports", timeout, store.find_ports(build_id))
        .await?
        .map(normalize_origins);

    Ok(BuildDetail { build, ports })
}
