//! Mycotheca HTTP API library.
//!
//! Exposes config, state, error handling, routes and the router builder so
//! integration tests and the binaries share one code path.

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
