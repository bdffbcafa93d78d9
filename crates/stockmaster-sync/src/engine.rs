//! # Ledger Engine
//!
//! The write path of the stock ledger: optimistic local commits with
//! fire-and-forget remote pushes.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Optimistic Stock Movement                            │
//! │                                                                         │
//! │  caller ──► commit_movement()          (synchronous, never blocks       │
//! │              │                          on the network)                 │
//! │              ├─ validate quantity > 0, product exists                   │
//! │              ├─ mint transaction (uuid v4, now, frozen unit price)      │
//! │              └─ Mirror::apply_movement (stock patch + log prepend,      │
//! │                 write-through)                                          │
//! │                                                                         │
//! │  then ────► push to remote             (background task; outcome        │
//! │              │                          feeds ONLY the status lamp)     │
//! │              ├─ ok  ──► mark_connected                                  │
//! │              └─ err ──► mark_error     (local commit stands)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed remote push is never rolled back locally; the divergence is
//! repaired by the next successful [`LedgerEngine::reconcile`], which
//! replaces local state wholesale with the server's view.
//!
//! ## Negative Stock
//! The ledger is permissive: an OUT movement may drive stock below zero.
//! Refusing the sale at the terminal would be worse than a correctable
//! count; the low-stock report surfaces the discrepancy.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use stockmaster_core::{
    reports, validation, Account, Cart, CartLine, CoreError, CoreResult, DashboardStats, Money,
    MovementKind, NewProduct, Product, StockTransaction, Supplier,
};
use stockmaster_store::Mirror;

use crate::client::RemoteStore;
use crate::error::{SyncError, SyncResult};
use crate::status::{DbStatus, SyncStatusTracker};

// =============================================================================
// Sale Receipt
// =============================================================================

/// Summary of a finalized sale, priced at the cart's frozen snapshots.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    /// The committed sale lines, in cart order.
    pub lines: Vec<CartLine>,
    /// Subtotal at finalize time.
    pub subtotal_cents: Money,
}

impl SaleReceipt {
    fn empty() -> Self {
        SaleReceipt {
            lines: Vec::new(),
            subtotal_cents: Money::zero(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Ledger Engine
// =============================================================================

/// Per-session engine over the mirror, the remote store and the status lamp.
///
/// Cheaply cloneable; background push tasks hold their own clone.
#[derive(Clone)]
pub struct LedgerEngine {
    account: Account,
    mirror: Arc<Mutex<Mirror>>,
    remote: Arc<dyn RemoteStore>,
    status: SyncStatusTracker,
}

impl std::fmt::Debug for LedgerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerEngine")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

impl LedgerEngine {
    /// Builds an engine for an account. The status lamp starts in
    /// [`DbStatus::Syncing`]: the first reconciliation is expected to follow
    /// immediately.
    pub fn new(account: Account, mirror: Mirror, remote: Arc<dyn RemoteStore>) -> Self {
        LedgerEngine {
            account,
            mirror: Arc::new(Mutex::new(mirror)),
            remote,
            status: SyncStatusTracker::new(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// The current sync status.
    pub fn status(&self) -> DbStatus {
        self.status.current()
    }

    /// The status lamp itself, for subscribers.
    pub fn status_tracker(&self) -> &SyncStatusTracker {
        &self.status
    }

    // =========================================================================
    // Mirror Accessors
    // =========================================================================

    pub fn products(&self) -> Vec<Product> {
        self.lock_mirror().products().to_vec()
    }

    pub fn transactions(&self) -> Vec<StockTransaction> {
        self.lock_mirror().transactions().to_vec()
    }

    pub fn suppliers(&self) -> Vec<Supplier> {
        self.lock_mirror().suppliers().to_vec()
    }

    pub fn product(&self, product_id: &str) -> Option<Product> {
        self.lock_mirror().product(product_id).cloned()
    }

    /// Resolves an untrusted scanned code against the mirror by SKU.
    pub fn lookup_scanned_code(&self, code: &str) -> CoreResult<Product> {
        self.lock_mirror()
            .product_by_sku(code)
            .cloned()
            .ok_or_else(|| CoreError::UnrecognizedCode { code: code.into() })
    }

    /// Dashboard aggregates over the mirrored collections.
    pub fn dashboard_stats(&self) -> DashboardStats {
        let mirror = self.lock_mirror();
        reports::dashboard_stats(mirror.products(), mirror.transactions())
    }

    // =========================================================================
    // Stock Movements
    // =========================================================================

    /// The synchronous optimistic commit: validates, mints exactly one
    /// transaction, and patches the mirror. No network I/O happens here.
    pub fn commit_movement(
        &self,
        product_id: &str,
        kind: MovementKind,
        quantity: i64,
        unit_price_cents: Money,
    ) -> CoreResult<StockTransaction> {
        validation::validate_quantity(quantity).map_err(CoreError::from)?;

        let mut mirror = self.lock_mirror();
        let product = mirror
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let delta = match kind {
            MovementKind::In => quantity,
            MovementKind::Out => -quantity,
        };
        let new_stock = product.stock + delta;

        let transaction = StockTransaction {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            kind,
            quantity,
            unit_price_cents,
            timestamp: Utc::now(),
            note: None,
        };

        // Persist failures degrade durability, never availability: the
        // in-memory ledger is already updated when apply_movement returns.
        if let Err(e) = mirror.apply_movement(product_id, new_stock, transaction.clone()) {
            warn!(product_id, ?e, "Ledger commit not persisted locally");
        }

        info!(
            product_id,
            %kind,
            quantity,
            new_stock,
            "Committed stock movement"
        );
        Ok(transaction)
    }

    /// Commits a movement locally, then pushes it remotely on a detached
    /// task. The caller observes the local result only; the remote outcome
    /// moves the status lamp.
    pub fn apply_stock_movement(
        &self,
        product_id: &str,
        kind: MovementKind,
        quantity: i64,
        unit_price_cents: Money,
    ) -> CoreResult<StockTransaction> {
        let transaction = self.commit_movement(product_id, kind, quantity, unit_price_cents)?;

        let engine = self.clone();
        let push = transaction.clone();
        tokio::spawn(async move {
            engine.status.begin_sync();
            engine.push_movement(&push).await;
        });

        Ok(transaction)
    }

    /// Pushes one committed movement to the remote store, flipping the lamp.
    async fn push_movement(&self, transaction: &StockTransaction) {
        let result = self
            .remote
            .update_stock(
                &self.account.id,
                &transaction.product_id,
                transaction.kind,
                transaction.quantity,
            )
            .await;

        match result {
            Ok(ack) => {
                debug!(
                    product_id = %transaction.product_id,
                    remote_stock = ack.new_stock,
                    "Remote accepted stock movement"
                );
                self.status.mark_connected();
            }
            Err(e) => {
                warn!(
                    product_id = %transaction.product_id,
                    %e,
                    "Remote push failed; local commit stands"
                );
                self.status.mark_error();
            }
        }
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Finalizes the cart as one OUT movement per line.
    ///
    /// All lines commit locally first (cart order, at each line's frozen
    /// price), then push remotely one at a time in the same order. Per-line
    /// push failures are swallowed into the status lamp; atomicity across
    /// lines is deliberately weak. The cart is cleared unconditionally.
    pub async fn finalize_sale(&self, cart: &mut Cart) -> CoreResult<SaleReceipt> {
        if cart.is_empty() {
            return Ok(SaleReceipt::empty());
        }

        let lines = cart.lines().to_vec();
        let mut committed = Vec::with_capacity(lines.len());
        let mut receipt_lines = Vec::with_capacity(lines.len());

        for line in &lines {
            match self.commit_movement(
                &line.product_id,
                MovementKind::Out,
                line.quantity,
                line.unit_price_cents,
            ) {
                Ok(transaction) => {
                    committed.push(transaction);
                    receipt_lines.push(line.clone());
                }
                // A line can go stale if a reconciliation removed the product
                // between add-to-cart and checkout. Sell the rest.
                Err(CoreError::ProductNotFound(id)) => {
                    warn!(product_id = %id, "Skipping sale line for vanished product");
                }
                Err(e) => {
                    cart.clear();
                    return Err(e);
                }
            }
        }

        self.status.begin_sync();
        for transaction in &committed {
            self.push_movement(transaction).await;
        }

        let subtotal_cents = receipt_lines.iter().map(|l| l.line_total_cents()).sum();
        info!(
            lines = receipt_lines.len(),
            subtotal = %subtotal_cents,
            "Sale finalized"
        );

        cart.clear();
        Ok(SaleReceipt {
            lines: receipt_lines,
            subtotal_cents,
        })
    }

    // =========================================================================
    // Product Creation
    // =========================================================================

    /// Creates a product, remote-first with an offline fallback.
    ///
    /// Validation runs before any network traffic. On remote success the
    /// server-assigned product is mirrored; on remote failure a locally
    /// minted product is mirrored instead and the lamp goes to Error, so
    /// the terminal keeps working while disconnected.
    pub async fn add_product(&self, draft: NewProduct) -> SyncResult<Product> {
        validation::validate_product_name(&draft.name).map_err(CoreError::from)?;
        validation::validate_sku(&draft.sku).map_err(CoreError::from)?;
        validation::validate_price_cents(draft.price_cents.cents()).map_err(CoreError::from)?;

        let product = match self.remote.add_product(&self.account.id, &draft).await {
            Ok(product) => {
                self.status.mark_connected();
                product
            }
            Err(e) => {
                warn!(%e, sku = %draft.sku, "Remote create failed; creating product locally");
                self.status.mark_error();
                Product {
                    id: Uuid::new_v4().to_string(),
                    sku: draft.sku,
                    name: draft.name,
                    category: draft.category,
                    price_cents: draft.price_cents,
                    stock: draft.stock,
                    min_stock_level: draft.min_stock_level,
                    expiry_date: draft.expiry_date,
                    supplier_id: draft.supplier_id,
                    created_at: Utc::now(),
                }
            }
        };

        if let Err(e) = self.lock_mirror().insert_product(product.clone()) {
            warn!(product_id = %product.id, ?e, "New product not persisted locally");
        }

        info!(product_id = %product.id, sku = %product.sku, "Product added");
        Ok(product)
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Fetches the server's view of all three collections and replaces the
    /// mirror wholesale.
    ///
    /// Products and transactions must both succeed; a supplier failure alone
    /// degrades to an empty supplier set (the endpoint may not exist on
    /// older backends). On failure the mirror is left untouched.
    pub async fn reconcile(&self) -> SyncResult<()> {
        self.status.begin_sync();

        let (products, transactions, suppliers) = tokio::join!(
            self.remote.get_products(&self.account.id),
            self.remote.get_transactions(&self.account.id),
            self.remote.get_suppliers(&self.account.id),
        );

        let (products, transactions) = match (products, transactions) {
            (Ok(p), Ok(t)) => (p, t),
            (Err(e), _) | (_, Err(e)) => {
                warn!(%e, "Reconciliation fetch failed; mirror untouched");
                self.status.mark_error();
                return Err(e);
            }
        };

        let suppliers = suppliers.unwrap_or_else(|e| {
            warn!(%e, "Supplier fetch failed; continuing with empty set");
            Vec::new()
        });

        info!(
            products = products.len(),
            transactions = transactions.len(),
            suppliers = suppliers.len(),
            "Reconciled with remote store"
        );

        if let Err(e) = self
            .lock_mirror()
            .replace_all(products, transactions, suppliers)
        {
            warn!(?e, "Reconciled state not persisted locally");
        }
        self.status.mark_connected();
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// A poisoned mirror lock is recovered rather than propagated: the mirror
    /// holds plain data and every mutation leaves it structurally valid.
    fn lock_mirror(&self) -> MutexGuard<'_, Mirror> {
        self.mirror
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UpdateStockResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use stockmaster_core::Category;
    use stockmaster_store::LocalStore;

    // -------------------------------------------------------------------------
    // Mock remote store
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct MockRemote {
        fail_updates: AtomicBool,
        fail_products: AtomicBool,
        fail_suppliers: AtomicBool,
        fail_add_product: AtomicBool,
        server_products: Mutex<Vec<Product>>,
        server_suppliers: Mutex<Vec<Supplier>>,
        update_calls: Mutex<Vec<(String, MovementKind, i64)>>,
        add_calls: AtomicUsize,
    }

    impl MockRemote {
        fn unavailable() -> SyncError {
            SyncError::RemoteUnavailable {
                reason: "mock offline".into(),
            }
        }
    }

    #[async_trait]
    impl RemoteStore for MockRemote {
        async fn register(&self, email: &str, _password: &str) -> SyncResult<Account> {
            Ok(Account {
                id: "u1".into(),
                email: email.into(),
            })
        }

        async fn login(&self, email: &str, _password: &str) -> SyncResult<Account> {
            Ok(Account {
                id: "u1".into(),
                email: email.into(),
            })
        }

        async fn get_products(&self, _account_id: &str) -> SyncResult<Vec<Product>> {
            if self.fail_products.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            Ok(self.server_products.lock().unwrap().clone())
        }

        async fn add_product(
            &self,
            _account_id: &str,
            product: &NewProduct,
        ) -> SyncResult<Product> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_add_product.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            Ok(Product {
                id: "server-assigned".into(),
                sku: product.sku.clone(),
                name: product.name.clone(),
                category: product.category,
                price_cents: product.price_cents,
                stock: product.stock,
                min_stock_level: product.min_stock_level,
                expiry_date: product.expiry_date,
                supplier_id: product.supplier_id.clone(),
                created_at: Utc::now(),
            })
        }

        async fn update_stock(
            &self,
            _account_id: &str,
            product_id: &str,
            kind: MovementKind,
            quantity: i64,
        ) -> SyncResult<UpdateStockResponse> {
            self.update_calls
                .lock()
                .unwrap()
                .push((product_id.to_string(), kind, quantity));
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            Ok(UpdateStockResponse {
                status: "ok".into(),
                new_stock: 0,
            })
        }

        async fn get_transactions(&self, _account_id: &str) -> SyncResult<Vec<StockTransaction>> {
            Ok(Vec::new())
        }

        async fn get_suppliers(&self, _account_id: &str) -> SyncResult<Vec<Supplier>> {
            if self.fail_suppliers.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            Ok(self.server_suppliers.lock().unwrap().clone())
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.into(),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            category: Category::Food,
            price_cents: Money::from_cents(price_cents),
            stock,
            min_stock_level: 5,
            expiry_date: None,
            supplier_id: "s1".into(),
            created_at: Utc::now(),
        }
    }

    fn engine_with(
        products: Vec<Product>,
    ) -> (tempfile::TempDir, Arc<MockRemote>, LedgerEngine) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open_at(dir.path()).unwrap();
        store.save_products("u1", &products).unwrap();
        let mirror = Mirror::rehydrate(store, "u1");

        let remote = Arc::new(MockRemote::default());
        let engine = LedgerEngine::new(
            Account {
                id: "u1".into(),
                email: "shop@example.com".into(),
            },
            mirror,
            remote.clone(),
        );
        (dir, remote, engine)
    }

    // -------------------------------------------------------------------------
    // Movements
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_commit_movement_is_local_and_appends_one_transaction() {
        let (_dir, remote, engine) = engine_with(vec![product("p1", 1000, 10)]);

        let txn = engine
            .commit_movement("p1", MovementKind::Out, 3, Money::from_cents(1000))
            .unwrap();

        assert_eq!(txn.quantity, 3);
        assert_eq!(engine.product("p1").unwrap().stock, 7);
        assert_eq!(engine.transactions().len(), 1);
        // Purely local: no remote traffic.
        assert!(remote.update_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_movement_allows_negative_stock() {
        let (_dir, _remote, engine) = engine_with(vec![product("p1", 1000, 2)]);

        engine
            .commit_movement("p1", MovementKind::Out, 5, Money::from_cents(1000))
            .unwrap();

        assert_eq!(engine.product("p1").unwrap().stock, -3);
    }

    #[tokio::test]
    async fn test_commit_movement_rejects_bad_input_without_mutating() {
        let (_dir, _remote, engine) = engine_with(vec![product("p1", 1000, 10)]);

        assert!(engine
            .commit_movement("p1", MovementKind::In, 0, Money::zero())
            .is_err());
        assert!(engine
            .commit_movement("ghost", MovementKind::In, 1, Money::zero())
            .is_err());

        assert_eq!(engine.product("p1").unwrap().stock, 10);
        assert!(engine.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_apply_stock_movement_push_failure_keeps_local_commit() {
        let (_dir, remote, engine) = engine_with(vec![product("p1", 1000, 10)]);
        remote.fail_updates.store(true, Ordering::SeqCst);

        let mut status = engine.status_tracker().subscribe();
        engine
            .apply_stock_movement("p1", MovementKind::Out, 4, Money::from_cents(1000))
            .unwrap();

        // Local ledger already reflects the movement.
        assert_eq!(engine.product("p1").unwrap().stock, 6);

        // Wait for the detached push to settle on Error.
        while *status.borrow_and_update() != DbStatus::Error {
            status.changed().await.unwrap();
        }
        assert_eq!(engine.product("p1").unwrap().stock, 6); // no rollback
        assert_eq!(engine.transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_stock_movement_push_success_marks_connected() {
        let (_dir, remote, engine) = engine_with(vec![product("p1", 1000, 10)]);

        let mut status = engine.status_tracker().subscribe();
        engine
            .apply_stock_movement("p1", MovementKind::In, 5, Money::from_cents(1000))
            .unwrap();

        while *status.borrow_and_update() != DbStatus::Connected {
            status.changed().await.unwrap();
        }
        assert_eq!(engine.product("p1").unwrap().stock, 15);
        assert_eq!(remote.update_calls.lock().unwrap().len(), 1);
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_finalize_sale_commits_lines_in_order_then_pushes_sequentially() {
        let (_dir, remote, engine) =
            engine_with(vec![product("p1", 1000, 10), product("p2", 500, 8)]);

        let mut cart = Cart::new();
        cart.add_line(&engine.product("p1").unwrap()).unwrap();
        cart.add_line(&engine.product("p1").unwrap()).unwrap(); // qty 2
        cart.add_line(&engine.product("p2").unwrap()).unwrap();

        let receipt = engine.finalize_sale(&mut cart).await.unwrap();

        assert_eq!(receipt.line_count(), 2);
        assert_eq!(receipt.total_quantity(), 3);
        assert_eq!(receipt.subtotal_cents.cents(), 2500);
        assert!(cart.is_empty());

        assert_eq!(engine.product("p1").unwrap().stock, 8);
        assert_eq!(engine.product("p2").unwrap().stock, 7);

        // Pushes arrive in cart order.
        let calls = remote.update_calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                ("p1".to_string(), MovementKind::Out, 2),
                ("p2".to_string(), MovementKind::Out, 1)
            ]
        );
        assert_eq!(engine.status(), DbStatus::Connected);
    }

    #[tokio::test]
    async fn test_finalize_sale_remote_failure_keeps_commits_and_clears_cart() {
        let (_dir, remote, engine) = engine_with(vec![product("p1", 1000, 10)]);
        remote.fail_updates.store(true, Ordering::SeqCst);

        let mut cart = Cart::new();
        cart.add_line(&engine.product("p1").unwrap()).unwrap();

        let receipt = engine.finalize_sale(&mut cart).await.unwrap();

        assert_eq!(receipt.line_count(), 1);
        assert!(cart.is_empty()); // cleared even though the push failed
        assert_eq!(engine.product("p1").unwrap().stock, 9);
        assert_eq!(engine.status(), DbStatus::Error);
    }

    #[tokio::test]
    async fn test_finalize_sale_empty_cart_is_noop() {
        let (_dir, remote, engine) = engine_with(vec![product("p1", 1000, 10)]);

        let mut cart = Cart::new();
        let receipt = engine.finalize_sale(&mut cart).await.unwrap();

        assert!(receipt.is_empty());
        assert!(remote.update_calls.lock().unwrap().is_empty());
        assert!(engine.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_sale_skips_vanished_products() {
        let (_dir, remote, engine) = engine_with(vec![product("p1", 1000, 10)]);

        let mut cart = Cart::new();
        cart.add_line(&engine.product("p1").unwrap()).unwrap();
        cart.add_line(&product("ghost", 100, 5)).unwrap(); // not in mirror

        let receipt = engine.finalize_sale(&mut cart).await.unwrap();

        assert_eq!(receipt.line_count(), 1);
        assert_eq!(receipt.lines[0].product_id, "p1");
        assert!(cart.is_empty());
        assert_eq!(remote.update_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_sale_uses_frozen_line_prices() {
        let (_dir, _remote, engine) = engine_with(vec![product("p1", 1000, 10)]);

        let mut cart = Cart::new();
        cart.add_line(&engine.product("p1").unwrap()).unwrap();

        // Price drifts between add and checkout.
        let drifted = product("p1", 9999, 10);
        {
            let mut mirror = engine.lock_mirror();
            mirror.replace_all(vec![drifted], vec![], vec![]).unwrap();
        }

        let receipt = engine.finalize_sale(&mut cart).await.unwrap();
        assert_eq!(receipt.subtotal_cents.cents(), 1000);
        assert_eq!(engine.transactions()[0].unit_price_cents.cents(), 1000);
    }

    // -------------------------------------------------------------------------
    // Product creation
    // -------------------------------------------------------------------------

    fn draft(sku: &str, name: &str, price_cents: i64) -> NewProduct {
        NewProduct {
            sku: sku.into(),
            name: name.into(),
            category: Category::Office,
            price_cents: Money::from_cents(price_cents),
            stock: 10,
            min_stock_level: 5,
            expiry_date: None,
            supplier_id: "s1".into(),
        }
    }

    #[tokio::test]
    async fn test_add_product_mirrors_server_assigned_record() {
        let (_dir, remote, engine) = engine_with(vec![]);

        let created = engine.add_product(draft("SKU-1", "Stapler", 300)).await.unwrap();

        assert_eq!(created.id, "server-assigned");
        assert_eq!(engine.products()[0].id, "server-assigned");
        assert_eq!(engine.status(), DbStatus::Connected);
        assert_eq!(remote.add_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_product_offline_fallback_mints_locally() {
        let (_dir, remote, engine) = engine_with(vec![]);
        remote.fail_add_product.store(true, Ordering::SeqCst);

        let created = engine.add_product(draft("SKU-1", "Stapler", 300)).await.unwrap();

        assert_ne!(created.id, "server-assigned");
        assert!(!created.id.is_empty());
        assert_eq!(engine.products().len(), 1);
        assert_eq!(engine.status(), DbStatus::Error);
    }

    #[tokio::test]
    async fn test_add_product_validation_failure_makes_no_remote_call() {
        let (_dir, remote, engine) = engine_with(vec![]);

        assert!(engine.add_product(draft("SKU-1", "", 300)).await.is_err());
        assert!(engine.add_product(draft("", "Stapler", 300)).await.is_err());
        assert!(engine.add_product(draft("SKU-1", "Stapler", -5)).await.is_err());

        assert_eq!(remote.add_calls.load(Ordering::SeqCst), 0);
        assert!(engine.products().is_empty());
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reconcile_replaces_mirror_wholesale() {
        let (_dir, remote, engine) = engine_with(vec![product("stale", 100, 1)]);
        *remote.server_products.lock().unwrap() = vec![product("fresh", 200, 9)];

        engine.reconcile().await.unwrap();

        assert!(engine.product("stale").is_none());
        assert_eq!(engine.product("fresh").unwrap().stock, 9);
        assert_eq!(engine.status(), DbStatus::Connected);
    }

    #[tokio::test]
    async fn test_reconcile_supplier_failure_degrades_to_empty() {
        let (_dir, remote, engine) = engine_with(vec![]);
        *remote.server_products.lock().unwrap() = vec![product("p1", 100, 3)];
        remote.fail_suppliers.store(true, Ordering::SeqCst);

        engine.reconcile().await.unwrap();

        assert_eq!(engine.products().len(), 1);
        assert!(engine.suppliers().is_empty());
        assert_eq!(engine.status(), DbStatus::Connected);
    }

    #[tokio::test]
    async fn test_reconcile_product_failure_leaves_mirror_untouched() {
        let (_dir, remote, engine) = engine_with(vec![product("local", 100, 4)]);
        remote.fail_products.store(true, Ordering::SeqCst);

        assert!(engine.reconcile().await.is_err());

        assert_eq!(engine.product("local").unwrap().stock, 4);
        assert_eq!(engine.status(), DbStatus::Error);
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_lookup_scanned_code() {
        let (_dir, _remote, engine) = engine_with(vec![product("p1", 100, 3)]);

        assert_eq!(engine.lookup_scanned_code("SKU-p1").unwrap().id, "p1");

        let err = engine.lookup_scanned_code("scanner-noise").unwrap_err();
        assert!(matches!(err, CoreError::UnrecognizedCode { .. }));
    }

    #[tokio::test]
    async fn test_dashboard_stats_over_mirror() {
        let (_dir, _remote, engine) = engine_with(vec![product("p1", 1000, 3)]);

        engine
            .commit_movement("p1", MovementKind::Out, 2, Money::from_cents(1000))
            .unwrap();

        let stats = engine.dashboard_stats();
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.total_revenue.cents(), 2000);
    }
}
