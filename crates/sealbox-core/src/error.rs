//! Error types for secret storage.

use thiserror::Error;

/// Errors that can occur during secret operations.
///
/// `NotFound` deliberately covers never-existed, already-redeemed and
/// swept-away identifiers alike, so a caller cannot probe for an
/// identifier's history. `Decryption` likewise carries no detail that
/// would distinguish a wrong key from tampered ciphertext.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("entropy source unavailable: {0}")]
    RandomSource(String),

    #[error("invalid master key length")]
    InvalidKey,

    #[error("encryption failed")]
    Encryption,

    #[error("decryption failed")]
    Decryption,

    #[error("secret not found")]
    NotFound,

    #[error("secret expired")]
    Expired,
}

/// Convenience result alias for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
