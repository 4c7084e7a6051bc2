//! builds — One build execution on a build farm node.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::builds;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = builds)]
pub struct Build {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub build_type: String,
    #[serde(default)]
    pub setname: String,
    pub ptname: String,
    pub jailname: String,
    pub buildname: String,
    pub server: String,
    /// Unix timestamp (seconds) at which the build started.
    pub started: i64,
    /// Set on the most recent build of each
    /// (setname, ptname, jailname, buildname, server) coordinate.
    #[serde(default)]
    pub latest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap: Option<serde_json::Value>,
}

impl Build {
    /// Seconds elapsed according to the last snapshot, if recorded.
    pub fn elapsed(&self) -> Option<i64> {
        let elapsed = self.snap.as_ref()?.get("elapsed")?;
        elapsed
            .as_i64()
            .or_else(|| elapsed.as_str().and_then(|s| s.parse().ok()))
    }
}
