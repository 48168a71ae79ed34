//! Load generator for a chat application's HTTP API.
//!
//! Simulated users register, log in, and then exercise contacts, messages
//! and groups endpoints with randomized think time between tasks.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod testing;
pub mod transport;
pub mod user;

pub use error::{ConfigError, TransportError};
