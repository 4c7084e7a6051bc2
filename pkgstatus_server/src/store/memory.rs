//! In-memory record store loaded from a JSON fixture document.
//!
//! The document has the shape `{"builds": [...], "ports": [...], "servers": [...]}`
//! with records serialized exactly as the API returns them.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::{compare_by, BuildQuery, Projection, RecordStore, SortKey, StoreError};
use crate::models::build::Build;
use crate::models::ports::PortResults;
use crate::models::server::Server;

#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub builds: Vec<Build>,
    #[serde(default)]
    pub ports: Vec<PortResults>,
    #[serde(default)]
    pub servers: Vec<Server>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    builds: Vec<Build>,
    ports: HashMap<String, PortResults>,
    servers: HashMap<String, Server>,
}

impl MemoryStore {
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            builds: fixtures.builds,
            ports: fixtures
                .ports
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            servers: fixtures
                .servers
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            builds = store.builds.len(),
            ports = store.ports.len(),
            servers = store.servers.len(),
            "Loaded fixture records"
        );
        Ok(store)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_builds(
        &self,
        query: &BuildQuery,
        projection: &Projection,
        sort: &[SortKey],
    ) -> Result<Vec<Build>, StoreError> {
        let mut results: Vec<Build> = self
            .builds
            .iter()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        results.sort_by(|a, b| compare_by(sort, a, b));
        for build in &mut results {
            projection.apply(build);
        }
        Ok(results)
    }

    async fn find_build(&self, id: &str) -> Result<Option<Build>, StoreError> {
        Ok(self.builds.iter().find(|b| b.id == id).cloned())
    }

    async fn find_ports(&self, id: &str) -> Result<Option<PortResults>, StoreError> {
        Ok(self.ports.get(id).cloned())
    }

    async fn find_server(&self, id: &str) -> Result<Option<Server>, StoreError> {
        Ok(self.servers.get(id).map(|s| Server {
            masternames: None,
            ..s.clone()
        }))
    }
}
