//! # Domain Types
//!
//! Core domain types used throughout StockMaster.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │   │ StockTransaction │   │    Supplier     │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id             │   │  id              │   │  id             │      │
//! │  │  sku (business) │   │  product_id (FK) │   │  name           │      │
//! │  │  stock          │   │  kind (IN/OUT)   │   │  contact        │      │
//! │  │  price_cents    │   │  unit_price      │   │  email          │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐                            │
//! │  │    Account      │   │    Category      │                            │
//! │  │  ─────────────  │   │  ──────────────  │                            │
//! │  │  id             │   │  Electronics     │                            │
//! │  │  email          │   │  Clothing | ...  │                            │
//! │  └─────────────────┘   └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Ledger Invariant
//! A product's `stock` field is a *cached derivation* of its transaction log:
//! it must always reconcile to `sum(IN.quantity) - sum(OUT.quantity)`. The
//! remote store recomputes this authoritatively; the client maintains an
//! incremental mirror. Transactions are append-only: never updated, never
//! deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Account
// =============================================================================

/// A user account. Scopes every other entity: products, transactions and
/// suppliers are owned by exactly one account, and all storage keys and
/// remote calls are account-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
}

// =============================================================================
// Category
// =============================================================================

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Food,
    Office,
    Others,
}

impl Default for Category {
    fn default() -> Self {
        Category::Others
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Food => "Food",
            Category::Office => "Office",
            Category::Others => "Others",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
///
/// ## Mutation Rule
/// `stock` is mutated **only** through ledger stock movements; there is no
/// in-place edit path in the core. Direct field edits (price, name) are out
/// of scope for the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (server-assigned on create, UUID v4 when minted
    /// offline).
    pub id: String,

    /// Stock Keeping Unit - free-text business identifier. Intended unique
    /// within an account, but uniqueness is not enforced client-side.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Product category.
    pub category: Category,

    /// Unit price in paise.
    pub price_cents: Money,

    /// Current stock level - a cached derivation of the transaction log.
    /// May go negative if sales race; the ledger is permissive by design.
    pub stock: i64,

    /// Minimum-stock threshold for the low-stock predicate.
    pub min_stock_level: i64,

    /// Optional expiry date (perishables).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,

    /// Loose reference to a supplier. Not load-bearing: the supplier endpoint
    /// may be absent entirely.
    pub supplier_id: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Low-stock is a derived predicate, never a stored flag.
    #[inline]
    pub fn low_stock(&self) -> bool {
        self.stock <= self.min_stock_level
    }

    /// Value of the stock on hand at the current unit price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price_cents.multiply_quantity(self.stock)
    }
}

// =============================================================================
// New Product Draft
// =============================================================================

/// A product draft before creation: everything except the server-assigned
/// identifier and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: Category,
    pub price_cents: Money,
    pub stock: i64,
    pub min_stock_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    pub supplier_id: String,
}

// =============================================================================
// Stock Movement Kind
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Stock received (purchase, restock, correction upward).
    In,
    /// Stock sold or removed.
    Out,
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementKind::In => f.write_str("IN"),
            MovementKind::Out => f.write_str("OUT"),
        }
    }
}

// =============================================================================
// Stock Transaction
// =============================================================================

/// One entry in the append-only stock ledger.
///
/// ## Immutability
/// Once created a transaction is never updated or deleted. The transaction
/// log is the system of record for stock history; `Product::stock` is merely
/// a cache over it.
///
/// ## Price Capture
/// `unit_price_cents` is captured at the moment of the movement and
/// intentionally NOT re-read from the product later, so historic revenue
/// figures stay accurate even if the price changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    /// Locally-generated unique identifier (UUID v4).
    pub id: String,

    /// The product this movement applies to.
    pub product_id: String,

    /// IN or OUT.
    #[serde(rename = "type")]
    pub kind: MovementKind,

    /// Units moved. Always > 0; direction lives in `kind`.
    pub quantity: i64,

    /// Unit price at the time of the transaction (frozen).
    pub unit_price_cents: Money,

    /// When the movement happened.
    pub timestamp: DateTime<Utc>,

    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StockTransaction {
    /// Total value of this movement (unit price × quantity).
    #[inline]
    pub fn total_cents(&self) -> Money {
        self.unit_price_cents.multiply_quantity(self.quantity)
    }

    /// Signed stock delta this transaction contributes: +quantity for IN,
    /// -quantity for OUT.
    #[inline]
    pub fn stock_delta(&self) -> i64 {
        match self.kind {
            MovementKind::In => self.quantity,
            MovementKind::Out => -self.quantity,
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier. Loosely linked from products; not load-bearing for the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub email: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min: i64) -> Product {
        Product {
            id: "p1".into(),
            sku: "SKU-001".into(),
            name: "Wireless Mouse".into(),
            category: Category::Electronics,
            price_cents: Money::from_cents(10_000),
            stock,
            min_stock_level: min,
            expiry_date: None,
            supplier_id: "s1".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_predicate() {
        assert!(product(5, 5).low_stock()); // at threshold counts as low
        assert!(product(0, 5).low_stock());
        assert!(product(-2, 5).low_stock());
        assert!(!product(7, 5).low_stock());
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(product(3, 5).stock_value().cents(), 30_000);
    }

    #[test]
    fn test_movement_kind_wire_format() {
        assert_eq!(serde_json::to_string(&MovementKind::In).unwrap(), "\"IN\"");
        assert_eq!(serde_json::to_string(&MovementKind::Out).unwrap(), "\"OUT\"");
        let kind: MovementKind = serde_json::from_str("\"OUT\"").unwrap();
        assert_eq!(kind, MovementKind::Out);
    }

    #[test]
    fn test_transaction_wire_format_uses_camel_case_and_type() {
        let txn = StockTransaction {
            id: "t1".into(),
            product_id: "p1".into(),
            kind: MovementKind::Out,
            quantity: 2,
            unit_price_cents: Money::from_cents(100),
            timestamp: Utc::now(),
            note: None,
        };
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"productId\""));
        assert!(json.contains("\"type\":\"OUT\""));
        assert!(!json.contains("\"note\""));
    }

    #[test]
    fn test_stock_delta() {
        let mut txn = StockTransaction {
            id: "t1".into(),
            product_id: "p1".into(),
            kind: MovementKind::In,
            quantity: 4,
            unit_price_cents: Money::zero(),
            timestamp: Utc::now(),
            note: None,
        };
        assert_eq!(txn.stock_delta(), 4);
        txn.kind = MovementKind::Out;
        assert_eq!(txn.stock_delta(), -4);
    }

    #[test]
    fn test_category_default_is_others() {
        assert_eq!(Category::default(), Category::Others);
    }
}
