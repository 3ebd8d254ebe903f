//! AES-256-GCM payload encryption and identifier generation.
//!
//! Every payload is sealed directly under the process master key with a
//! fresh random nonce per call. The nonce is prepended to the ciphertext so
//! callers only need to keep track of a single opaque blob. Identifiers are
//! the SHA-256 digest of 32 fresh random bytes, rendered as lowercase hex,
//! so raw CSPRNG output is never exposed in a user-facing value.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{Result, SecretError};

/// AES-GCM nonce size in bytes.
pub const NONCE_SIZE: usize = 12;
/// Master key size in bytes (AES-256).
pub const KEY_SIZE: usize = 32;
/// Bytes of randomness hashed into an identifier.
const ID_SEED_SIZE: usize = 32;

/// Fill `buf` from the OS entropy source.
fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| SecretError::RandomSource(e.to_string()))
}

/// Generate a new random 256-bit master key.
///
/// Called once per store; the key lives for the process lifetime and is
/// never persisted.
pub fn generate_master_key() -> Result<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; KEY_SIZE]);
    fill_random(&mut key)?;
    Ok(key)
}

/// Encrypt `plaintext` under `key`, returning `nonce || ciphertext || tag`.
///
/// A fresh random nonce is drawn per call; nonce reuse under the same key
/// would void the AEAD guarantees, so nonces are never cached or derived.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SecretError::InvalidKey)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    fill_random(&mut nonce_bytes)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| SecretError::Encryption)?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a blob previously produced by [`seal`].
///
/// Truncated input, a flipped bit anywhere in the blob, or a different key
/// all fail with [`SecretError::Decryption`] -- never with empty or partial
/// plaintext.
pub fn open(key: &[u8], blob: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SecretError::InvalidKey)?;

    if blob.len() < NONCE_SIZE {
        return Err(SecretError::Decryption);
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);

    let nonce = Nonce::from_slice(nonce_bytes);
    cipher
        .decrypt(nonce, ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| SecretError::Decryption)
}

/// Generate an unguessable secret identifier.
///
/// 32 bytes of fresh randomness, hashed with SHA-256 and hex-encoded: a
/// 64-character lowercase string, independent of payload content, creation
/// time and sequence.
pub fn generate_id() -> Result<String> {
    let mut seed = [0u8; ID_SEED_SIZE];
    fill_random(&mut seed)?;
    Ok(hex::encode(Sha256::digest(seed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_seal_open() {
        let key = generate_master_key().unwrap();
        let plaintext = b"hello, secret world!";

        let blob = seal(&key, plaintext).unwrap();
        let decrypted = open(&key, &blob).unwrap();

        assert_eq!(&*decrypted, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key_a = generate_master_key().unwrap();
        let key_b = generate_master_key().unwrap();

        let blob = seal(&key_a, b"sensitive data").unwrap();
        assert!(matches!(open(&key_b, &blob), Err(SecretError::Decryption)));
    }

    #[test]
    fn test_tampered_blob_fails() {
        let key = generate_master_key().unwrap();
        let mut blob = seal(&key, b"important secret").unwrap();

        // Flip a byte in the ciphertext portion (after the nonce).
        blob[NONCE_SIZE + 1] ^= 0xff;

        assert!(matches!(open(&key, &blob), Err(SecretError::Decryption)));
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let key = generate_master_key().unwrap();
        let mut blob = seal(&key, b"important secret").unwrap();

        blob[0] ^= 0x01;

        assert!(matches!(open(&key, &blob), Err(SecretError::Decryption)));
    }

    #[test]
    fn test_truncated_blob_fails() {
        let key = generate_master_key().unwrap();
        assert!(matches!(
            open(&key, &[0u8; NONCE_SIZE - 1]),
            Err(SecretError::Decryption)
        ));
    }

    #[test]
    fn test_invalid_key_length() {
        assert!(matches!(
            seal(&[0u8; 16], b"data"),
            Err(SecretError::InvalidKey)
        ));
        assert!(matches!(
            open(&[0u8; 16], &[0u8; 32]),
            Err(SecretError::InvalidKey)
        ));
    }

    #[test]
    fn test_same_plaintext_different_blobs() {
        let key = generate_master_key().unwrap();

        // Fresh nonce per call, so identical plaintexts never collide.
        let a = seal(&key, b"same plaintext").unwrap();
        let b = seal(&key, b"same plaintext").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_plaintext_works() {
        let key = generate_master_key().unwrap();
        let blob = seal(&key, b"").unwrap();
        let decrypted = open(&key, &blob).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_id_format() {
        let id = generate_id().unwrap();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_id_uniqueness() {
        let ids: std::collections::HashSet<String> =
            (0..10_000).map(|_| generate_id().unwrap()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
