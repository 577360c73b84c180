//! Folio daemon library: HTTP API over the experience-level engine.
//!
//! The binary in `main.rs` only wires config, storage and the server together so
//! the router can be driven directly from integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
