use std::collections::HashMap;
use std::sync::PoisonError;
use std::sync::RwLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

/// Process-local set of revoked session tokens.
///
/// Keys are the exact token strings, values the moment of revocation.
/// An entry only needs to outlive the token it blocks, so every `revoke`
/// prunes entries older than `retention` (the session lifetime).
///
/// Readers share the lock; `revoke` holds it exclusively for insert plus
/// cleanup. State is in memory only and starts empty on every restart, so
/// a deployment with several processes needs a shared store instead.
#[derive(Debug)]
pub struct RevocationRegistry {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
    retention: Duration,
}

impl RevocationRegistry {
    /// Create an empty registry that forgets entries after `retention`.
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// Mark `token` as revoked. Revoking twice just refreshes the timestamp.
    pub fn revoke(&self, token: &str) {
        self.revoke_at(token, Utc::now());
    }

    fn revoke_at(&self, token: &str, now: DateTime<Utc>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        entries.insert(token.to_string(), now);

        // A retention reaching past the clock's range never expires anything.
        let Some(horizon) = now.checked_sub_signed(self.retention) else {
            return;
        };
        let before = entries.len();
        entries.retain(|_, revoked_at| *revoked_at >= horizon);

        let pruned = before - entries.len();
        if pruned > 0 {
            tracing::debug!(
                pruned,
                remaining = entries.len(),
                "Pruned stale revocation entries"
            );
        }
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(token)
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }
}
