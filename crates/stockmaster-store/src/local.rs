//! # Durable Document Store
//!
//! One JSON document per account-scoped key, written synchronously on every
//! mutation (write-through). The layout mirrors the conceptual keys of the
//! persisted local state:
//!
//! ```text
//! <data dir>/
//!   session.json                     # the active account, or absent
//!   products_<accountId>.json        # Vec<Product>
//!   transactions_<accountId>.json    # Vec<StockTransaction>
//!   suppliers_<accountId>.json       # Vec<Supplier>
//! ```
//!
//! ## Degradation Rule
//! A missing or corrupt document loads as the empty default. Persisted data
//! must never make the app unusable; the remote store is the source of truth
//! and the next reconciliation overwrites whatever was lost.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockmaster_core::{Account, Product, StockTransaction, Supplier};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Session Record
// =============================================================================

/// The persisted session: which account (if any) is active.
///
/// Cleared on sign-out. Per-account collection documents are deliberately
/// NOT deleted on sign-out; they are reused on the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub account: Account,
}

// =============================================================================
// Local Store
// =============================================================================

/// Directory-backed JSON document store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Opens the store in the platform data directory, creating it if needed.
    pub fn open_default() -> StoreResult<Self> {
        let dirs = directories::ProjectDirs::from("com", "stockmaster", "stockmaster")
            .ok_or(StoreError::DataDirUnavailable)?;
        Self::open_at(dirs.data_dir())
    }

    /// Opens the store rooted at an explicit directory (used by tests).
    pub fn open_at(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Opened local store");
        Ok(LocalStore { root })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Loads the persisted session, if any. Corrupt records load as `None`.
    pub fn load_session(&self) -> Option<SessionRecord> {
        self.read_doc("session.json")
    }

    /// Persists the session record.
    pub fn save_session(&self, session: &SessionRecord) -> StoreResult<()> {
        self.write_doc("session.json", session)
    }

    /// Removes the session record. Removing an absent record is a no-op.
    pub fn clear_session(&self) -> StoreResult<()> {
        let path = self.root.join("session.json");
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Account-Scoped Collections
    // =========================================================================

    /// Loads the product collection for an account (empty if absent/corrupt).
    pub fn load_products(&self, account_id: &str) -> Vec<Product> {
        self.read_doc(&collection_key("products", account_id))
            .unwrap_or_default()
    }

    /// Persists the product collection for an account.
    pub fn save_products(&self, account_id: &str, products: &[Product]) -> StoreResult<()> {
        self.write_doc(&collection_key("products", account_id), &products)
    }

    /// Loads the transaction log for an account (empty if absent/corrupt).
    pub fn load_transactions(&self, account_id: &str) -> Vec<StockTransaction> {
        self.read_doc(&collection_key("transactions", account_id))
            .unwrap_or_default()
    }

    /// Persists the transaction log for an account.
    pub fn save_transactions(
        &self,
        account_id: &str,
        transactions: &[StockTransaction],
    ) -> StoreResult<()> {
        self.write_doc(&collection_key("transactions", account_id), &transactions)
    }

    /// Loads the supplier collection for an account (empty if absent/corrupt).
    pub fn load_suppliers(&self, account_id: &str) -> Vec<Supplier> {
        self.read_doc(&collection_key("suppliers", account_id))
            .unwrap_or_default()
    }

    /// Persists the supplier collection for an account.
    pub fn save_suppliers(&self, account_id: &str, suppliers: &[Supplier]) -> StoreResult<()> {
        self.write_doc(&collection_key("suppliers", account_id), &suppliers)
    }

    // =========================================================================
    // Document Plumbing
    // =========================================================================

    /// Reads a document. Missing or unreadable documents yield `None`; a
    /// corrupt cache must never take the app down.
    fn read_doc<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.root.join(name);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(name, ?e, "Failed to read local document");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(name, ?e, "Discarding corrupt local document");
                None
            }
        }
    }

    /// Writes a document via temp-file-and-rename so a crash mid-write
    /// cannot leave a truncated document behind.
    fn write_doc<T: Serialize>(&self, name: &str, value: &T) -> StoreResult<()> {
        let path = self.root.join(name);
        let tmp = self.root.join(format!("{name}.tmp"));

        let contents = serde_json::to_string(value)?;
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Account-scoped document key, e.g. `products_<accountId>.json`.
fn collection_key(collection: &str, account_id: &str) -> String {
    format!("{collection}_{account_id}.json")
}

// =============================================================================
// Unit Tests
// =============================================================================
