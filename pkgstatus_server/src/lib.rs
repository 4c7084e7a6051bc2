//! pkgstatus — status browser for a distributed package build farm.
//!
//! Reads the build, port-result, and server records the build farm agents
//! publish, and serves them as a filterable build listing, per-build port
//! results, and redirects to the node that ran a build.

pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

pub use config::PkgstatusConfig;
pub use error::Error;
pub use routes::{router, AppState};
