//! Build farm records — builds, per-build port results, and servers.

pub mod build;
pub mod ports;
pub mod server;
