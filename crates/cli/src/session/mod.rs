// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Login session.
//!
//! The session owns the credential pair. Any task may read it; only login,
//! logout and the refresh routine write it, and refreshes are single-flight:
//! callers that hit an expired credential at the same time wait on one lock,
//! and all but the first find the credential already renewed.
//!
//! ```text
//!   task A ──401──► refresh_after(stale) ──lock──► POST /token/refresh/ ──► new token
//!   task B ──401──► refresh_after(stale) ──wait──────────────────────────► new token
//! ```

mod store;

pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError, StoreResult,
};

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use ys_core::api::Tokens;

use crate::error::{Error, Result};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Display name of the logged-in company.
pub const USER_KEY: &str = "user";

pub struct Session {
    store: Arc<dyn CredentialStore>,
    refresh_lock: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Session {
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    /// A session backed by an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self.store.get(ACCESS_TOKEN_KEY)?)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.store.get(REFRESH_TOKEN_KEY)?)
    }

    pub fn user(&self) -> Result<Option<String>> {
        Ok(self.store.get(USER_KEY)?)
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.access_token()?.is_some())
    }

    /// Stores a fresh credential pair after login.
    pub fn set_credentials(&self, tokens: &Tokens, user: Option<&str>) -> Result<()> {
        self.store_tokens(tokens)?;
        match user {
            Some(user) => self.store.set(USER_KEY, user)?,
            None => self.store.remove(USER_KEY)?,
        }
        Ok(())
    }

    fn store_tokens(&self, tokens: &Tokens) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        Ok(())
    }

    /// Forgets every stored credential.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }

    /// Renews the credential that was rejected as `stale`, at most once.
    ///
    /// If another task already replaced `stale` while this one waited for the
    /// lock, the replacement is returned without calling `refresh`. Without a
    /// refresh token, or when `refresh` fails, the session is cleared and
    /// [`Error::SessionExpired`] is returned to every waiter.
    pub async fn refresh_after<F, Fut>(&self, stale: &str, refresh: F) -> Result<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Tokens>>,
    {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.access_token()? {
            if current != stale {
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.refresh_token()? else {
            warn!("no refresh token stored, ending session");
            self.clear()?;
            return Err(Error::SessionExpired);
        };

        match refresh(refresh_token).await {
            Ok(tokens) => {
                self.store_tokens(&tokens)?;
                info!("access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, ending session");
                self.clear()?;
                Err(Error::SessionExpired)
            }
        }
    }
}
