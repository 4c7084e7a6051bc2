//! ports — Per-origin package results of a single build.
//!
//! Keyed by the same identifier as the build. Origins (`category/portname`)
//! may contain a `.`, which the agents escape as `%` when writing map keys.
//! See [`crate::services::origin`] for the read-side repair.

use std::collections::BTreeMap;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::ports;

/// Origin to per-origin outcome metadata.
pub type OutcomeMap = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortResults {
    #[serde(rename = "_id")]
    pub id: String,
    /// Origin to package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkgnames: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built: Option<OutcomeMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<OutcomeMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<OutcomeMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored: Option<OutcomeMap>,
}

impl PortResults {
    /// The four outcome mappings, in a fixed order.
    pub fn outcomes_mut(&mut self) -> [&mut Option<OutcomeMap>; 4] {
        [
            &mut self.built,
            &mut self.failed,
            &mut self.skipped,
            &mut self.ignored,
        ]
    }

    pub fn outcomes(&self) -> [&Option<OutcomeMap>; 4] {
        [&self.built, &self.failed, &self.skipped, &self.ignored]
    }
}

/// Raw `ports` row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ports)]
pub struct PortsRow {
    pub id: String,
    pub pkgnames: Option<serde_json::Value>,
    pub built: Option<serde_json::Value>,
    pub failed: Option<serde_json::Value>,
    pub skipped: Option<serde_json::Value>,
    pub ignored: Option<serde_json::Value>,
}

impl TryFrom<PortsRow> for PortResults {
    type Error = serde_json::Error;

    fn try_from(row: PortsRow) -> Result<Self, Self::Error> {
        fn decode<T: serde::de::DeserializeOwned>(
            value: Option<serde_json::Value>,
        ) -> Result<Option<T>, serde_json::Error> {
            value
                .filter(|v| !v.is_null())
                .map(serde_json::from_value)
                .transpose()
        }

        Ok(Self {
            id: row.id,
            pkgnames: decode(row.pkgnames)?,
            built: decode(row.built)?,
            failed: decode(row.failed)?,
            skipped: decode(row.skipped)?,
            ignored: decode(row.ignored)?,
        })
    }
}
