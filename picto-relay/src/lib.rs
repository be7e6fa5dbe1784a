// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Picto Relay
//!
//! A forwarding relay for browser clients. It answers CORS preflights
//! itself, forwards every other request to the upstream API with only the
//! credential and content-type headers, and stamps a fixed CORS header set
//! on every response.
//!
//! - [`server::router`] - The axum router
//! - [`forward`] - Header filtering and request forwarding
//! - [`cors`] - The CORS header set

pub mod config;
pub mod cors;
pub mod error;
pub mod forward;
pub mod server;

pub use config::{DEFAULT_UPSTREAM, RelayConfig};
pub use error::RelayError;
pub use forward::FORWARDED_HEADERS;
pub use server::{RelayState, SERVICE_NAME, bind, router, serve};
