//! # In-Memory Mirror
//!
//! The per-account cache of products, transactions and suppliers.
//!
//! ## Consistency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mirror Lifecycle                                 │
//! │                                                                         │
//! │  session start ──► rehydrate() from durable documents                   │
//! │                                                                         │
//! │  ledger commit ──► apply_movement() / insert_product()                  │
//! │                    (incremental optimistic patch, write-through)        │
//! │                                                                         │
//! │  reconcile ok  ──► replace_all()                                        │
//! │                    (wholesale overwrite - server is authoritative;      │
//! │                     local-only changes not yet echoed by the server     │
//! │                     are discarded here, by design)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mirror may be transiently stale, but it must reconcile to the
//! transaction-log derivation of stock on every successful fetch.
//!
//! Every mutation persists synchronously through [`LocalStore`]
//! (write-through, not write-back). In-memory state is updated *before* the
//! persist attempt: a full disk degrades durability, never availability.

use tracing::debug;

use stockmaster_core::{Product, StockTransaction, Supplier};

use crate::error::StoreResult;
use crate::local::LocalStore;

/// The active account's local cache of the three remote collections.
#[derive(Debug)]
pub struct Mirror {
    account_id: String,
    store: LocalStore,
    products: Vec<Product>,
    transactions: Vec<StockTransaction>,
    suppliers: Vec<Supplier>,
}

impl Mirror {
    /// Rehydrates the mirror for an account from the durable store.
    ///
    /// Missing or corrupt documents load as empty collections; the first
    /// successful reconciliation repopulates them from the server.
    pub fn rehydrate(store: LocalStore, account_id: impl Into<String>) -> Self {
        let account_id = account_id.into();
        let products = store.load_products(&account_id);
        let transactions = store.load_transactions(&account_id);
        let suppliers = store.load_suppliers(&account_id);

        debug!(
            account_id = %account_id,
            products = products.len(),
            transactions = transactions.len(),
            suppliers = suppliers.len(),
            "Rehydrated mirror"
        );

        Mirror {
            account_id,
            store,
            products,
            transactions,
            suppliers,
        }
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn transactions(&self) -> &[StockTransaction] {
        &self.transactions
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// Looks up a product by identifier.
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Looks up a product by SKU. The code is an untrusted lookup key (it
    /// usually comes from the barcode scanner); a miss is an expected outcome.
    pub fn product_by_sku(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku == code)
    }

    // =========================================================================
    // Mutations (write-through)
    // =========================================================================

    /// Wholesale replacement of all three collections with server data.
    ///
    /// This is the reconciliation merge strategy: full overwrite, not a diff.
    /// Callers only invoke this after a *successful* combined fetch; on
    /// failure the mirror stays byte-for-byte untouched.
    pub fn replace_all(
        &mut self,
        products: Vec<Product>,
        transactions: Vec<StockTransaction>,
        suppliers: Vec<Supplier>,
    ) -> StoreResult<()> {
        self.products = products;
        self.transactions = transactions;
        self.suppliers = suppliers;

        self.store.save_products(&self.account_id, &self.products)?;
        self.store
            .save_transactions(&self.account_id, &self.transactions)?;
        self.store.save_suppliers(&self.account_id, &self.suppliers)?;
        Ok(())
    }

    /// Optimistic incremental patch: set a product's stock and prepend the
    /// movement to the transaction log, persisting both collections.
    ///
    /// The stock/transaction pair is atomic from the caller's perspective:
    /// there is no stock mutation without its log entry.
    pub fn apply_movement(
        &mut self,
        product_id: &str,
        new_stock: i64,
        transaction: StockTransaction,
    ) -> StoreResult<()> {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
            product.stock = new_stock;
        }
        self.transactions.insert(0, transaction);

        self.store.save_products(&self.account_id, &self.products)?;
        self.store
            .save_transactions(&self.account_id, &self.transactions)?;
        Ok(())
    }

    /// Prepends a newly created product.
    pub fn insert_product(&mut self, product: Product) -> StoreResult<()> {
        self.products.insert(0, product);
        self.store.save_products(&self.account_id, &self.products)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
