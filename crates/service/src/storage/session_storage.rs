use std::sync::Arc;

use models::Session;
use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::storage::kv_store::KeyValueStore;

/// Serialized session record.
pub const USER_KEY: &str = "user";
/// Legacy flag: `"true"`/`"false"`.
pub const COMPANY_REGISTERED_KEY: &str = "companyRegistered";
/// Legacy flag: `"true"` once a plan was activated locally.
pub const HAS_SUBSCRIPTION_KEY: &str = "hasSubscription";
/// Set once the bolt-on upsell was shown or is moot.
pub const BOLT_ON_OFFER_SEEN_KEY: &str = "boltOnOfferSeen";
/// Legacy bearer token, read only as a fallback at startup.
pub const LEGACY_TOKEN_KEY: &str = "authToken";

/// Session-aware view over a [`KeyValueStore`].
///
/// Owns the `user` key and the legacy compatibility keys; nothing else
/// reads or writes them.
pub struct SessionStorage<K: KeyValueStore + ?Sized> {
    kv: Arc<K>,
}

impl<K: KeyValueStore + ?Sized> Clone for SessionStorage<K> {
    fn clone(&self) -> Self {
        Self { kv: Arc::clone(&self.kv) }
    }
}

impl<K: KeyValueStore + ?Sized> SessionStorage<K> {
    pub fn new(kv: Arc<K>) -> Self { Self { kv } }

    /// Stored session, or `None` when absent, unreadable or unparsable.
    pub fn load_session(&self) -> Option<Session> {
        let raw = match self.kv.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "reading stored session failed");
                return None;
            }
        };
        match serde_json::from_str::<Option<Session>>(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "stored session is not valid json; ignoring it");
                None
            }
        }
    }

    pub fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(USER_KEY, &raw)
    }

    /// Raw serialized record, for consistency checks.
    pub fn raw_session(&self) -> Option<String> {
        self.kv.get(USER_KEY).ok().flatten()
    }

    pub fn legacy_token(&self) -> Option<String> {
        self.kv
            .get(LEGACY_TOKEN_KEY)
            .ok()
            .flatten()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Best-effort removal of the session and its legacy companions.
    pub fn clear_session(&self) {
        for key in [USER_KEY, COMPANY_REGISTERED_KEY, HAS_SUBSCRIPTION_KEY, LEGACY_TOKEN_KEY] {
            if let Err(e) = self.kv.remove(key) {
                warn!(key, error = %e, "removing session key failed");
            }
        }
    }

    /// Mirror a locally activated plan into the legacy flags.
    pub fn mark_subscription_active(&self) {
        self.set_flag(COMPANY_REGISTERED_KEY, true);
        self.set_flag(HAS_SUBSCRIPTION_KEY, true);
    }

    pub fn company_registered_flag(&self) -> bool {
        self.flag(COMPANY_REGISTERED_KEY)
    }

    pub fn has_subscription_flag(&self) -> bool {
        self.flag(HAS_SUBSCRIPTION_KEY)
    }

    /// `true` stores the flag, `false` clears the key.
    pub fn set_bolt_on_offer_seen(&self, seen: bool) {
        let res = if seen {
            self.kv.set(BOLT_ON_OFFER_SEEN_KEY, "true")
        } else {
            self.kv.remove(BOLT_ON_OFFER_SEEN_KEY)
        };
        if let Err(e) = res {
            warn!(seen, error = %e, "updating bolt-on flag failed");
        }
    }

    pub fn bolt_on_offer_seen(&self) -> bool {
        self.flag(BOLT_ON_OFFER_SEEN_KEY)
    }

    fn set_flag(&self, key: &str, value: bool) {
        let raw = if value { "true" } else { "false" };
        match self.kv.set(key, raw) {
            Ok(()) => debug!(key, value, "legacy flag written"),
            Err(e) => warn!(key, error = %e, "writing legacy flag failed"),
        }
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.kv.get(key), Ok(Some(v)) if v == "true")
    }
}
