//! HTTP server wrapper around [`mockidp_auth`].
//!
//! Handles process concerns: configuration loading, tracing setup, listener
//! binding, and graceful shutdown. The protocol itself lives in
//! `mockidp-auth`.

pub mod config;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use server::{build_router, run};
