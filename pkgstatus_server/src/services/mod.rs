//! Build status services — query resolution, lookups, and node redirects.

pub mod build_service;
pub mod filter;
pub mod origin;
pub mod redirect;

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::store::StoreError;

/// Run one store round-trip, failing with [`Error::StoreTimeout`] after `limit`.
pub(crate) async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, Error>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let started = Instant::now();
    let result = tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Error::StoreTimeout)?;
    crate::metrics::store_latency(operation, started.elapsed());
    Ok(result?)
}
