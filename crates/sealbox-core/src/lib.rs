//! Encrypted, expiring, single-read secret storage for Sealbox.
//!
//! This crate provides:
//! - AES-256-GCM encryption of every payload under a process-lifetime master key
//! - Atomic read-then-delete redemption (each secret is retrievable at most once)
//! - TTL expiry, enforced lazily on redeem and eagerly by a background sweep

pub mod crypto;
pub mod error;
pub mod store;

pub use error::{Result, SecretError};
pub use store::{SecretStore, SweepHandle};
