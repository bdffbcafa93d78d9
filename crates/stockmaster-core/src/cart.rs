//! # Cart Aggregator
//!
//! Accumulates pending sale lines before they are committed as a batch of
//! ledger movements.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Aggregator Flow                               │
//! │                                                                         │
//! │  add_line(product) ──► lines.push / quantity += 1                       │
//! │  increment_line    ──► quantity += 1 (capped by mirrored stock)         │
//! │  decrement_line    ──► quantity -= 1 (removes line at quantity 1)       │
//! │  remove_line       ──► lines.remove                                     │
//! │  finalize (engine) ──► one OUT movement per line, then clear            │
//! │                                                                         │
//! │  The cart is ephemeral: in-memory, per-session, never persisted.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No quantity-0 line ever exists
//! - A product with `stock <= 0` cannot enter the cart
//! - Line snapshots (name, SKU, price) are frozen at add-time: prices can
//!   drift between add and checkout without affecting already-added lines

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// A pending sale line.
///
/// Holds a frozen snapshot of the product's display fields. The snapshot is
/// what gets committed: the ledger captures `unit_price_cents` from here,
/// not from the product at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (for ledger commit and stock lookups).
    pub product_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price_cents: Money,

    /// Quantity in cart. Always >= 1.
    pub quantity: i64,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: 1,
        }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> Money {
        self.unit_price_cents.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-memory cart. One per session; emptied on finalize or clear.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, or bumps its quantity by 1 if present.
    ///
    /// ## Behavior
    /// - `stock <= 0` is rejected with [`CoreError::OutOfStock`]
    /// - the add path does NOT cap at available stock; only the explicit
    ///   increment path does (matches the permissive ledger model)
    pub fn add_line(&mut self, product: &Product) -> CoreResult<()> {
        if product.stock <= 0 {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity += 1;
            return Ok(());
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Increments a line's quantity by 1.
    ///
    /// Rejected with [`CoreError::InsufficientStock`] if the new quantity
    /// would exceed the product's currently mirrored stock. This is a soft,
    /// UX-level check; the ledger itself never rejects on stock.
    pub fn increment_line(&mut self, product_id: &str, available_stock: i64) -> CoreResult<()> {
        let line = self
            .line_mut(product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        if line.quantity + 1 > available_stock {
            return Err(CoreError::InsufficientStock {
                sku: line.sku.clone(),
                available: available_stock,
                requested: line.quantity + 1,
            });
        }

        line.quantity += 1;
        Ok(())
    }

    /// Decrements a line's quantity by 1; at quantity 1 the line is removed
    /// entirely, so a quantity-0 line can never exist.
    pub fn decrement_line(&mut self, product_id: &str) -> CoreResult<()> {
        let line = self
            .line_mut(product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.lines.retain(|l| l.product_id != product_id);
        }
        Ok(())
    }

    /// Removes a line unconditionally. Removing an absent line is a no-op.
    pub fn remove_line(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Clears all lines unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The pending lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal at the lines' frozen prices.
    pub fn subtotal_cents(&self) -> Money {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            category: Category::Electronics,
            price_cents: Money::from_cents(price_cents),
            stock,
            min_stock_level: 5,
            expiry_date: None,
            supplier_id: "s1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_line(&product).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(cart.subtotal_cents().cents(), 999);
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_line(&product).unwrap();
        cart.add_line(&product).unwrap();

        assert_eq!(cart.line_count(), 1); // still one distinct line
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_add_out_of_stock_never_changes_cart() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 0);

        let err = cart.add_line(&product).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_snapshot_is_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 1000, 10);
        cart.add_line(&product).unwrap();

        // Price drifts after the add; the line keeps the old price.
        product.price_cents = Money::from_cents(9999);
        assert_eq!(cart.lines()[0].unit_price_cents.cents(), 1000);
    }

    #[test]
    fn test_increment_capped_by_available_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 2);

        cart.add_line(&product).unwrap();
        cart.increment_line("1", product.stock).unwrap(); // 2 of 2

        let err = cart.increment_line("1", product.stock).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(cart.total_quantity(), 2); // never raised above stock
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 10);

        cart.add_line(&product).unwrap();
        cart.add_line(&product).unwrap(); // qty 2

        cart.decrement_line("1").unwrap(); // qty 1
        assert_eq!(cart.total_quantity(), 1);

        cart.decrement_line("1").unwrap(); // removed
        assert!(cart.is_empty());
        assert!(cart.lines().iter().all(|l| l.quantity > 0));
    }

    #[test]
    fn test_increment_missing_line() {
        let mut cart = Cart::new();
        let err = cart.increment_line("nope", 10).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound(_)));
    }

    #[test]
    fn test_remove_and_clear_unconditional() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 999, 10)).unwrap();
        cart.add_line(&test_product("2", 500, 10)).unwrap();

        cart.remove_line("1");
        assert_eq!(cart.line_count(), 1);
        cart.remove_line("absent"); // no-op

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_across_lines() {
        let mut cart = Cart::new();
        let a = test_product("a", 10_000, 10);
        let b = test_product("b", 20_000, 10);

        cart.add_line(&a).unwrap();
        cart.add_line(&a).unwrap(); // qty 2 @ 100
        cart.add_line(&b).unwrap(); // qty 1 @ 200

        assert_eq!(cart.subtotal_cents().cents(), 40_000);
    }
}
