use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::{
    clock::Clock,
    error::StorageError,
    management::CredentialStorage,
    types::{AuthResponse, Credential},
};

/// How long before the recorded expiry a token already counts as stale.
pub const REFRESH_SKEW_SECS: i64 = 300;

/// Owns the credential and its persisted copy.
///
/// Reads are served from memory. Writes update memory first and then the
/// storage, so a failed write never leaves the process with an older token
/// than the one it just obtained.
pub struct TokenStore {
    credential: RwLock<Credential>,
    storage: Arc<dyn CredentialStorage>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    /// Creates an empty store; nothing is read from `storage`.
    pub fn new(storage: Arc<dyn CredentialStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            credential: RwLock::new(Credential::default()),
            storage,
            clock,
        }
    }

    /// Creates a store holding whatever `storage` has persisted.
    pub async fn load(
        storage: Arc<dyn CredentialStorage>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        let credential = storage.read().await?.unwrap_or_default();
        Ok(Self {
            credential: RwLock::new(credential),
            storage,
            clock,
        })
    }

    pub fn get(&self) -> Credential {
        self.credential
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.get().access_token
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get().refresh_token
    }

    pub fn is_signed_in(&self) -> bool {
        self.get().access_token.is_some()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_stale(&self) -> bool {
        self.valid_access_token().is_none()
    }

    /// The access token, if it is present and outside the refresh skew window.
    pub fn valid_access_token(&self) -> Option<String> {
        let credential = self.get();
        let expires_at = credential.expires_at?;
        if self.clock.now() + Duration::seconds(REFRESH_SKEW_SECS) >= expires_at {
            return None;
        }
        credential.access_token
    }

    /// Remaining lifetime of the access token, negative once expired.
    pub fn expires_in(&self) -> Option<Duration> {
        self.get()
            .expires_at
            .map(|expires_at| expires_at - self.clock.now())
    }

    /// Applies a token endpoint response.
    ///
    /// A response without `refresh_token` keeps the stored one.
    pub async fn cache(&self, response: &AuthResponse) -> Result<(), StorageError> {
        let now = self.clock.now();
        let expires_at = i64::try_from(response.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));

        let snapshot = {
            let mut credential = self.credential.write().unwrap_or_else(|e| e.into_inner());
            credential.access_token = Some(response.access_token.clone());
            if let Some(refresh_token) = &response.refresh_token {
                credential.refresh_token = Some(refresh_token.clone());
            }
            credential.expires_at = expires_at;
            credential.clone()
        };

        debug!(
            expires_in = response.expires_in,
            rotated_refresh_token = response.refresh_token.is_some(),
            "cached token"
        );
        self.storage.write(&snapshot).await
    }

    /// Forgets every field, in memory and on disk.
    pub async fn clear(&self) -> Result<(), StorageError> {
        *self.credential.write().unwrap_or_else(|e| e.into_inner()) = Credential::default();
        self.storage.remove().await
    }
}
