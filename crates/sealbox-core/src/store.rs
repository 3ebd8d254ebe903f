//! The single-read secret store.
//!
//! [`SecretStore`] owns the process master key and the in-memory map from
//! identifier to encrypted record. One mutex guards the map for every
//! create, redeem and sweep; encryption and decryption run outside the
//! critical section. Per identifier the state machine is
//! `absent -> present -> {redeemed | expired-removed}`, every terminal
//! transition collapsing back to `absent` -- a removed record is never
//! reachable again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto;
use crate::error::{Result, SecretError};

/// One stored entry: ciphertext (nonce embedded) plus its expiry instant.
struct SecretRecord {
    ciphertext: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// In-memory store of encrypted, expiring, single-read secrets.
///
/// Construct one per process (or per test) and share it via [`Arc`]; there
/// is no ambient singleton. All secrets and the master key are lost on drop.
pub struct SecretStore {
    master_key: Zeroizing<Vec<u8>>,
    records: Mutex<HashMap<String, SecretRecord>>,
}

impl SecretStore {
    /// Create an empty store with a freshly generated master key.
    pub fn new() -> Result<Self> {
        Ok(Self {
            master_key: crypto::generate_master_key()?,
            records: Mutex::new(HashMap::new()),
        })
    }

    /// Encrypt `plaintext` and store it for `ttl`, returning the identifier
    /// under which it can be redeemed exactly once.
    ///
    /// A zero or negative `ttl` stores an already-expired record; callers
    /// that care must validate the TTL before calling. The identifier is
    /// inserted without checking for a pre-existing entry: with 256 bits of
    /// entropy a collision is cryptographically negligible.
    pub fn create(&self, plaintext: &[u8], ttl: chrono::Duration) -> Result<String> {
        let ciphertext = crypto::seal(&self.master_key, plaintext)?;
        let id = crypto::generate_id()?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.records
            .lock()
            .insert(id.clone(), SecretRecord { ciphertext, expires_at });

        debug!(expires_at = %expires_at, "stored secret");
        Ok(id)
    }

    /// Redeem `id`: return its plaintext and permanently remove it.
    ///
    /// The record is removed from the map in the same critical section as
    /// the lookup, before the expiry check, so a racing redeem or sweep can
    /// never observe it again -- at most one call ever succeeds for a given
    /// identifier. An expired record is discarded without being decrypted.
    pub fn redeem(&self, id: &str) -> Result<Zeroizing<Vec<u8>>> {
        let record = self
            .records
            .lock()
            .remove(id)
            .ok_or(SecretError::NotFound)?;

        if Utc::now() > record.expires_at {
            debug!("redeem of expired secret");
            return Err(SecretError::Expired);
        }

        crypto::open(&self.master_key, &record.ciphertext)
    }

    /// Delete every expired record in one pass, returning how many were
    /// removed. Uses the same lock as create/redeem.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| record.expires_at >= now);
        before - records.len()
    }

    /// Number of live records (including not-yet-swept expired ones).
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether the store currently holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Spawn the periodic expiry sweep, purging on every `interval` tick.
    ///
    /// Returns a [`SweepHandle`]; call [`SweepHandle::stop`] (or drop the
    /// handle) to end the task, so tests and shutdown can tear the store
    /// down without leaking a perpetual loop.
    pub fn start_sweep(self: &Arc<Self>, interval: Duration) -> SweepHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let store = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the first
            // purge happens one full interval after startup.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        debug!("sweep loop shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = store.purge_expired();
                        if removed > 0 {
                            debug!(removed, "swept expired secrets");
                        }
                    }
                }
            }
        });

        SweepHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running expiry sweep task.
///
/// Dropping the handle closes the shutdown channel, which also ends the
/// loop on its next poll.
pub struct SweepHandle {
    shutdown: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the sweep task to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(()).await;
        let _ = self.task.await;
    }
}
