//! In-process refresh-token revocation list
//!
//! Revoked jtis are held until their natural expiry. Each revocation also
//! sweeps out entries past expiry, so the registry stays bounded by the
//! number of live refresh tokens; an expired token fails validation on
//! its own.

use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

/// Revoked refresh-token registry keyed by jti
#[derive(Debug, Default)]
pub struct TokenBlacklist {
    // jti -> expiry (Unix timestamp)
    revoked: DashMap<String, usize>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: &str, expires_at: usize) {
        self.purge_expired(unix_now());
        self.revoked.insert(jti.to_string(), expires_at);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }

    /// Drop entries whose tokens have expired anyway
    pub fn purge_expired(&self, now: usize) {
        self.revoked.retain(|_, exp| *exp > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_check() {
        let blacklist = TokenBlacklist::new();
        assert!(!blacklist.is_revoked("abc"));
        blacklist.revoke("abc", 2_000_000_000);
        assert!(blacklist.is_revoked("abc"));
    }

    #[test]
    fn test_revoking_expired_tokens_stays_bounded() {
        let blacklist = TokenBlacklist::new();
        for i in 0..500 {
            blacklist.revoke(&format!("jti-{}", i), 100);
        }
        // Each revoke sweeps the previous already-expired entries out.
        assert_eq!(blacklist.len(), 1);
        blacklist.revoke("live", 4_000_000_000);
        assert_eq!(blacklist.len(), 1);
        assert!(blacklist.is_revoked("live"));
    }

    #[test]
    fn test_purge_keeps_live_entries() {
        let blacklist = TokenBlacklist::new();
        blacklist.revoke("old", 100);
        blacklist.revoke("live", 2_000_000_000);
        blacklist.purge_expired(1_000_000);
        assert!(!blacklist.is_revoked("old"));
        assert!(blacklist.is_revoked("live"));
        assert_eq!(blacklist.len(), 1);
    }
}
