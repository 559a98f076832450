//! Domain layer for the Mycotheca collection catalogue.
//!
//! Has no database dependency: error taxonomy, shared id/time types,
//! boundary form coercion, listing/search vocabulary, experiment status and
//! upload naming plus the content-store abstraction.

pub mod error;
pub mod experiment;
pub mod form;
pub mod search;
pub mod types;
pub mod uploads;
