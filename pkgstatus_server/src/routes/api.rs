//! Response bodies for the listing and detail endpoints.

use serde::Serialize;

use crate::format;
use crate::models::build::Build;
use crate::models::ports::PortResults;
use crate::services::build_service::BuildDetail;
use crate::services::filter::FilterEcho;

/// `GET /api/1/builds`.
#[derive(Debug, Serialize)]
pub struct BuildsJson {
    pub builds: Vec<Build>,
    pub filter: FilterEcho,
}

/// `GET /builds` — the listing plus what a page needs to render it.
#[derive(Debug, Serialize)]
pub struct BuildsPage {
    pub builds: Vec<BuildRow>,
    pub filter: FilterEcho,
    /// Echoed filter as a query string, for links that keep the filter.
    pub filter_qs: String,
}

#[derive(Debug, Serialize)]
pub struct BuildRow {
    #[serde(flatten)]
    pub build: Build,
    pub started_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_display: Option<String>,
}

impl From<Build> for BuildRow {
    fn from(build: Build) -> Self {
        Self {
            started_display: format::datetime(build.started, format::DEFAULT_DATETIME),
            elapsed_display: build.elapsed().map(format::duration),
            build,
        }
    }
}

impl BuildsPage {
    pub fn new(builds: Vec<Build>, filter: FilterEcho) -> Self {
        Self {
            filter_qs: filter.query_string(),
            builds: builds.into_iter().map(BuildRow::from).collect(),
            filter,
        }
    }
}

/// `GET /api/1/builds/{buildid}` and `GET /builds/{buildid}`.
#[derive(Debug, Serialize)]
pub struct BuildDetailJson {
    pub build: Build,
    pub ports: Option<PortResults>,
}

impl From<BuildDetail> for BuildDetailJson {
    fn from(detail: BuildDetail) -> Self {
        Self {
            build: detail.build,
            ports: detail.ports,
        }
    }
}
