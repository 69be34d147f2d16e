/// In-process session table with TTL eviction
///
/// The session strategy holds identity state server-side; the client only ever
/// sees an opaque reference (32 random bytes, hex-encoded) that has no meaning
/// except as a lookup key here. The table is an explicitly owned value
/// constructed once at process start and handed to the authenticator, never
/// reached through a global.
///
/// Expired entries are evicted lazily on lookup; there is no background sweep.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authenticator::Identity;
/// use taskdeck_shared::auth::session::SessionStore;
/// use taskdeck_shared::models::user::Role;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # async fn example() {
/// let store = SessionStore::new();
/// let identity = Identity {
///     user_id: Uuid::new_v4(),
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
///     role: Role::Employee,
/// };
///
/// let reference = store.insert(identity, Duration::hours(24)).await;
/// assert!(store.get(&reference).await.is_some());
///
/// store.remove(&reference).await;
/// assert!(store.get(&reference).await.is_none());
/// # }
/// ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tokio::sync::RwLock;

use super::authenticator::Identity;

/// Number of random bytes in an opaque session reference (64 hex chars)
const REFERENCE_BYTES: usize = 32;

/// A single session record
#[derive(Debug, Clone)]
struct Session {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// Concurrent session table keyed by opaque reference
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Creates an empty session table
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an identity and returns a fresh opaque reference
    ///
    /// The record expires absolutely `ttl` from now; expiry is not extended
    /// by use.
    pub async fn insert(&self, identity: Identity, ttl: Duration) -> String {
        let reference = generate_reference();
        let session = Session {
            identity,
            expires_at: Utc::now() + ttl,
        };

        self.entries
            .write()
            .await
            .insert(reference.clone(), session);

        reference
    }

    /// Looks up a reference, evicting it if expired
    ///
    /// Returns None for unknown and expired references alike.
    pub async fn get(&self, reference: &str) -> Option<Identity> {
        {
            let entries = self.entries.read().await;
            match entries.get(reference) {
                Some(session) if session.expires_at > Utc::now() => {
                    return Some(session.identity.clone());
                }
                Some(_) => {} // expired, fall through to evict
                None => return None,
            }
        }

        // Lazy eviction under the write lock; re-check expiry in case the
        // entry was replaced between lock acquisitions.
        let mut entries = self.entries.write().await;
        if let Some(session) = entries.get(reference) {
            if session.expires_at > Utc::now() {
                return Some(session.identity.clone());
            }
            entries.remove(reference);
        }

        None
    }

    /// Removes a session record, returning true if one existed
    ///
    /// This is the only path that terminates a session before its expiry.
    pub async fn remove(&self, reference: &str) -> bool {
        self.entries.write().await.remove(reference).is_some()
    }

    /// Number of records currently held, including not-yet-evicted expired ones
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when no records are held
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Generates an opaque session reference from OS randomness
fn generate_reference() -> String {
    let mut bytes = [0u8; REFERENCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
