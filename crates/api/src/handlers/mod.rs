//! Request handlers, one submodule per resource.
//!
//! Handlers convert request bodies into the repository DTOs, delegate to the
//! matching repository in `mycotheca_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod collection;
pub mod dashboard;
pub mod experiment;
pub mod image;
pub mod isolate;
pub mod search;
pub mod subculture;
pub mod uploads;
