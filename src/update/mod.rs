//! Update resolution layer for licensed plugins
//!
//! This module decides whether an installed product is behind the version the
//! license server advertises, caches that decision per product, and selects
//! the license notice shown next to an available update.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Client    │────▶│  Resolver   │────▶│    Cache    │
//! │  (fetch)    │     │ (evaluate)  │     │ (ttl store) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │                   │
//!        ▼                   ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Details   │     │   Compare   │     │ Memory/SQL  │
//! │  (payload)  │     │(version cmp)│     │   stores    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: Update-check cache keyed by product identity
//! - [`client`]: Remote info client trait and response model
//! - [`compare`]: Total ordering over version strings
//! - [`details`]: Extraction of the "view details" payload
//! - [`error`]: Error types for store, remote and configuration failures
//! - [`notice`]: License notice selection
//! - [`remote`]: HTTP implementation of the remote info client
//! - [`resolver`]: Cache-aware update resolution
//! - [`sqlite`]: SQLite-backed expiring store
//! - [`store`]: Expiring key-value store trait and in-memory store
//! - [`types`]: Product, environment and update record types

pub mod cache;
pub mod client;
pub mod compare;
pub mod details;
pub mod error;
pub mod notice;
pub mod remote;
pub mod resolver;
pub mod sqlite;
pub mod store;
pub mod types;
