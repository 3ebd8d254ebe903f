//! HTTP API for the Sealbox one-time secret exchange.
//!
//! This crate provides:
//! - `POST /api/v1/secret` to deposit a payload and receive its identifier
//! - `GET /api/v1/secret/:id` to redeem a payload exactly once
//! - The server loop with graceful shutdown and the background expiry sweep

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{Server, ServerConfig};

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ApiError>;
