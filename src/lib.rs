//! License-gated update checks for host plugin managers
//!
//! - [`update`]: version comparison, the update-check cache, remote lookup
//!   and license notices
//! - [`host`]: hook registration and the host-facing entry points
//! - [`config`]: configuration, constants and data paths
//! - [`logging`]: tracing subscriber setup for the binary

pub mod config;
pub mod host;
pub mod logging;
pub mod update;
