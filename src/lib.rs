//! Facility Archive
//!
//! Archive reporting and search over terminal-state facility records (work
//! orders, maintenance tasks, issue logs and inspection records) held in a
//! document store.
//!
//! # Modules
//!
//! - [`archive`]: report aggregation, summaries, audit persistence, search and CSV export
//! - [`lifecycle`]: auto-archiving, weekly task generation and audit retention
//! - [`state`]: the document store contract with in-memory and sled backends
//! - [`api`]: HTTP surface built on axum
//! - [`metrics`]: Prometheus counters and histograms

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod models;
pub mod state;

pub use error::{AppError, Result};
