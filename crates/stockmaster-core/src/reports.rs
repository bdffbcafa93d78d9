//! # Dashboard Reports
//!
//! Derived statistics over the mirrored products and transaction log.
//! Everything here is recomputed from the mirror on demand; nothing is
//! stored.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{MovementKind, Product, StockTransaction};

/// The headline figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of products in the inventory.
    pub total_products: usize,

    /// Σ price × stock across all products, at current prices.
    pub total_stock_value: Money,

    /// Number of products at or below their minimum-stock threshold.
    pub low_stock_items: usize,

    /// Σ quantity × captured unit price over all OUT transactions.
    /// Uses the frozen per-transaction price, so revenue stays accurate
    /// even after later price changes.
    pub total_revenue: Money,
}

/// Computes dashboard statistics from the current mirror contents.
pub fn dashboard_stats(products: &[Product], transactions: &[StockTransaction]) -> DashboardStats {
    let total_stock_value = products.iter().map(|p| p.stock_value()).sum();
    let low_stock_items = products.iter().filter(|p| p.low_stock()).count();
    let total_revenue = transactions
        .iter()
        .filter(|t| t.kind == MovementKind::Out)
        .map(|t| t.total_cents())
        .sum();

    DashboardStats {
        total_products: products.len(),
        total_stock_value,
        low_stock_items,
        total_revenue,
    }
}
