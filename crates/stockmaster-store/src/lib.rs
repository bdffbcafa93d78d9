//! # stockmaster-store: Local Mirror
//!
//! The on-device cache that keeps StockMaster usable offline.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Local Mirror Layers                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Mirror (mirror.rs)                                             │   │
//! │  │  In-memory products / transactions / suppliers for the active   │   │
//! │  │  account. Patched optimistically by the ledger engine, replaced │   │
//! │  │  wholesale on reconciliation.                                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ write-through (synchronous)            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │  LocalStore (local.rs)                                          │   │
//! │  │  One JSON document per account-scoped key:                      │   │
//! │  │    session.json                                                 │   │
//! │  │    products_<accountId>.json                                    │   │
//! │  │    transactions_<accountId>.json                                │   │
//! │  │    suppliers_<accountId>.json                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The write-through rule is what lets local state survive a restart before
//! the next successful remote reconciliation.

pub mod error;
pub mod local;
pub mod mirror;

pub use error::{StoreError, StoreResult};
pub use local::{LocalStore, SessionRecord};
pub use mirror::Mirror;
