//! servers — A build farm node that builds are redirected to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(rename = "_id")]
    pub id: String,
    pub host: String,
    /// Large per-master listing. Never loaded by lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masternames: Option<serde_json::Value>,
}
