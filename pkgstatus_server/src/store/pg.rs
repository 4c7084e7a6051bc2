//! PostgreSQL-backed record store (diesel-async over a deadpool pool).

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::{BuildQuery, Direction, Projection, RecordStore, SortField, SortKey, StoreError};
use crate::models::build::Build;
use crate::models::ports::{PortResults, PortsRow};
use crate::models::server::Server;
use crate::schema::{builds, ports, servers};

pub type PgPool = Pool<AsyncPgConnection>;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build a connection pool for `database_url`. Connections are opened lazily.
    pub fn connect(database_url: &str, max_size: usize) -> Result<Self, StoreError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager)
            .max_size(max_size)
            .build()
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<Object<AsyncPgConnection>, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_builds(
        &self,
        query: &BuildQuery,
        projection: &Projection,
        sort: &[SortKey],
    ) -> Result<Vec<Build>, StoreError> {
        let mut q = builds::table.select(Build::as_select()).into_boxed();

        if let Some(latest) = query.latest {
            q = q.filter(builds::latest.eq(latest));
        }
        if let Some(types) = &query.build_type {
            q = q.filter(builds::build_type.eq_any(types.clone()));
        }
        if let Some(setname) = &query.setname {
            q = q.filter(builds::setname.eq(setname.clone()));
        }
        if let Some(buildname) = &query.buildname {
            q = q.filter(builds::buildname.eq(buildname.clone()));
        }
        if let Some(jailname) = &query.jailname {
            q = q.filter(builds::jailname.eq(jailname.clone()));
        }
        if let Some(server) = &query.server {
            q = q.filter(builds::server.eq(server.clone()));
        }

        for key in sort {
            q = match (key.field, key.direction) {
                (SortField::Started, Direction::Ascending) => q.then_order_by(builds::started.asc()),
                (SortField::Started, Direction::Descending) => {
                    q.then_order_by(builds::started.desc())
                }
                (SortField::Setname, Direction::Ascending) => q.then_order_by(builds::setname.asc()),
                (SortField::Setname, Direction::Descending) => {
                    q.then_order_by(builds::setname.desc())
                }
                (SortField::Ptname, Direction::Ascending) => q.then_order_by(builds::ptname.asc()),
                (SortField::Ptname, Direction::Descending) => q.then_order_by(builds::ptname.desc()),
                (SortField::Jailname, Direction::Ascending) => {
                    q.then_order_by(builds::jailname.asc())
                }
                (SortField::Jailname, Direction::Descending) => {
                    q.then_order_by(builds::jailname.desc())
                }
                (SortField::Buildname, Direction::Ascending) => {
                    q.then_order_by(builds::buildname.asc())
                }
                (SortField::Buildname, Direction::Descending) => {
                    q.then_order_by(builds::buildname.desc())
                }
            };
        }

        let mut conn = self.conn().await?;
        let mut results = q.load::<Build>(&mut conn).await?;
        // JSONB sub-keys cannot be dropped through the typed select.
        for build in &mut results {
            projection.apply(build);
        }
        Ok(results)
    }

    async fn find_build(&self, id: &str) -> Result<Option<Build>, StoreError> {
        let mut conn = self.conn().await?;
        let result = builds::table
            .find(id)
            .select(Build::as_select())
            .first::<Build>(&mut conn)
            .await
            .optional()?;
        Ok(result)
    }

    async fn find_ports(&self, id: &str) -> Result<Option<PortResults>, StoreError> {
        let mut conn = self.conn().await?;
        let row = ports::table
            .find(id)
            .select(PortsRow::as_select())
            .first::<PortsRow>(&mut conn)
            .await
            .optional()?;
        Ok(row.map(PortResults::try_from).transpose()?)
    }

    async fn find_server(&self, id: &str) -> Result<Option<Server>, StoreError> {
        let mut conn = self.conn().await?;
        let row = servers::table
            .find(id)
            .select((servers::id, servers::host))
            .first::<(String, String)>(&mut conn)
            .await
            .optional()?;
        Ok(row.map(|(id, host)| Server {
            id,
            host,
            masternames: None,
        }))
    }
}
