//! Chat application HTTP API surface
//!
//! Routes and request payloads exercised by simulated users.

pub mod routes;
pub mod types;

pub use routes::{Method, Route};
pub use types::*;
