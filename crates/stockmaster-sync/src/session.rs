//! # Session Manager
//!
//! Sign-in, registration and session resumption. Opening a session wires
//! together the durable store, the rehydrated mirror and the remote client
//! into a ready-to-use [`LedgerEngine`].
//!
//! ## Lifecycle
//! ```text
//! login / register ──► remote auth ──► persist SessionRecord
//!                                       │
//! resume ───────────► load SessionRecord┤
//!                                       ▼
//!                            rehydrate Mirror ──► LedgerEngine (Syncing)
//!
//! sign_out ─────────► clear SessionRecord only
//!                     (per-account documents are kept for the next login)
//! ```

use std::sync::Arc;

use tracing::info;

use stockmaster_core::{validation, Account};
use stockmaster_store::{LocalStore, Mirror, SessionRecord};

use crate::client::RemoteStore;
use crate::engine::LedgerEngine;
use crate::error::{AuthError, SyncError, SyncResult};

/// Opens and closes account sessions.
pub struct SessionManager {
    store: LocalStore,
    remote: Arc<dyn RemoteStore>,
}

impl SessionManager {
    pub fn new(store: LocalStore, remote: Arc<dyn RemoteStore>) -> Self {
        SessionManager { store, remote }
    }

    /// Signs in against the remote store and opens a session.
    ///
    /// Auth failures surface synchronously as [`AuthError`]; there is no
    /// offline login.
    pub async fn login(&self, email: &str, password: &str) -> SyncResult<LedgerEngine> {
        if email.trim().is_empty() {
            return Err(AuthError::MissingField { field: "email" }.into());
        }
        if password.is_empty() {
            return Err(AuthError::MissingField { field: "password" }.into());
        }

        let account = self.remote.login(email.trim(), password).await?;
        info!(account_id = %account.id, "Signed in");
        self.open(account)
    }

    /// Registers a new account and opens a session.
    ///
    /// The password/confirmation comparison happens locally; a mismatch
    /// never reaches the network.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> SyncResult<LedgerEngine> {
        validation::validate_registration(email, password, confirmation).map_err(|e| match e {
            stockmaster_core::ValidationError::PasswordMismatch => {
                SyncError::Auth(AuthError::PasswordMismatch)
            }
            other => SyncError::Core(other.into()),
        })?;

        let account = self.remote.register(email.trim(), password).await?;
        info!(account_id = %account.id, "Registered new account");
        self.open(account)
    }

    /// Resumes the persisted session, if one exists.
    pub fn resume(&self) -> SyncResult<LedgerEngine> {
        let record = self
            .store
            .load_session()
            .ok_or(SyncError::Auth(AuthError::NotSignedIn))?;
        info!(account_id = %record.account.id, "Resumed session");
        self.open_without_persist(record.account)
    }

    /// Clears the session record. Per-account collection documents are
    /// deliberately retained for the next login.
    pub fn sign_out(&self, engine: LedgerEngine) -> SyncResult<()> {
        info!(account_id = %engine.account().id, "Signed out");
        drop(engine);
        self.store.clear_session()?;
        Ok(())
    }

    fn open(&self, account: Account) -> SyncResult<LedgerEngine> {
        self.store.save_session(&SessionRecord {
            account: account.clone(),
        })?;
        self.open_without_persist(account)
    }

    fn open_without_persist(&self, account: Account) -> SyncResult<LedgerEngine> {
        let mirror = Mirror::rehydrate(self.store.clone(), &account.id);
        Ok(LedgerEngine::new(account, mirror, self.remote.clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
