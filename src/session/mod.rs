//! Memory-resident session cache.
//!
//! Maps a credential's [`CacheKey`] to the CRM session obtained for it. Entries are
//! replaced wholesale on refresh and never mutated in place.
//!
//! # Expiry
//!
//! A read only returns an entry while `now < expires_at`; an entry at or past its expiry
//! is reported as absent, which makes the caller log in again. The periodic
//! [`sweep`](SessionCache::sweep) merely reclaims memory and is not needed for
//! correctness. There is no size bound or LRU: the key space is the number of distinct
//! credentials in use.
//!
//! # Concurrency
//!
//! The map sits behind a tokio `RwLock`; concurrent readers never block each other. Two
//! tasks racing on the first login for one credential both log in and the last `put`
//! wins.

pub mod profile;

pub use profile::Profile;

use crate::auth::CacheKey;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest cadence [`SessionCache::spawn_sweeper`] will run at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// A CRM session: token, expiry instant and the profile returned at login.
#[derive(Clone, PartialEq)]
pub struct SessionEntry {
    token: String,
    expires_at: DateTime<Utc>,
    profile: Profile,
}

impl SessionEntry {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>, profile: Profile) -> Self {
        Self {
            token: token.into(),
            expires_at,
            profile,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Strictly before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for SessionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEntry")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .field("profile", &self.profile)
            .finish()
    }
}

/// Thread-safe credential → session map. Clones share the same map.
#[derive(Clone, Default)]
pub struct SessionCache {
    entries: Arc<RwLock<HashMap<CacheKey, SessionEntry>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live session for `key`, judged against the current time.
    pub async fn get(&self, key: &CacheKey) -> Option<SessionEntry> {
        self.get_at(key, Utc::now()).await
    }

    /// Live session for `key`, judged against `now`.
    pub async fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<SessionEntry> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_valid_at(now))
            .cloned()
    }

    /// Store `entry`, replacing any previous session for `key`.
    pub async fn put(&self, key: CacheKey, entry: SessionEntry) {
        let mut entries = self.entries.write().await;
        entries.insert(key, entry);
    }

    /// Remove every entry with `expires_at <= now`; returns how many were removed.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid_at(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every session (useful for testing).
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Run [`sweep`](Self::sweep) every `every` on a background task.
    ///
    /// The first sweep happens one full interval after the call. Abort the returned
    /// handle to stop sweeping. Intervals below [`MIN_SWEEP_INTERVAL`] are raised to it.
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let every = every.max(MIN_SWEEP_INTERVAL);
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = cache.sweep(Utc::now()).await;
                if removed > 0 {
                    info!("Swept {} expired CRM session(s)", removed);
                } else {
                    debug!("Session sweep found nothing to remove");
                }
            }
        })
    }
}
