//! Host integration layer
//!
//! Wires the update engine to the host's plugin-management lifecycle through
//! an explicit hook registry instead of global callbacks.
//!
//! # Modules
//!
//! - [`adapter`]: Hook registration and the three host entry points
//! - [`hooks`]: Hook descriptors, request context and host-shaped payloads

pub mod adapter;
pub mod hooks;

pub use adapter::{HostAdapter, Updater};
pub use hooks::{Hook, HookOutput, HookRegistry, HostEvent, RequestContext, UpdateTransient};
