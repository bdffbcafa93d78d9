//! # stockmaster-sync: Ledger Engine and Remote Sync
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Sync Layers                                    │
//! │                                                                         │
//! │  ┌───────────────────┐      ┌────────────────────────────────────────┐ │
//! │  │  SessionManager   │      │  LedgerEngine                          │ │
//! │  │  (session.rs)     │─────►│  (engine.rs)                           │ │
//! │  │  login/register/  │      │  optimistic commit + background push   │ │
//! │  │  resume/sign-out  │      │  finalize_sale, add_product, reconcile │ │
//! │  └───────────────────┘      └───────┬───────────────────┬────────────┘ │
//! │                                     │                   │              │
//! │                        ┌────────────▼──────┐   ┌────────▼───────────┐  │
//! │                        │  RemoteStore      │   │  SyncStatusTracker │  │
//! │                        │  (client.rs)      │   │  (status.rs)       │  │
//! │                        │  JSON-over-HTTP,  │   │  connected/syncing │  │
//! │                        │  ?action= routing │   │  /error lamp       │  │
//! │                        └───────────────────┘   └────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Local-First Contract
//! A stock mutation commits to the in-memory mirror (and its write-through
//! documents) before any network traffic. The remote push runs afterwards
//! and its outcome feeds **only** the status tracker; a failed push never
//! rolls back the local ledger. The next successful reconciliation replaces
//! local state wholesale with the server's view.

pub mod client;
pub mod engine;
pub mod error;
pub mod session;
pub mod status;

pub use client::{HttpRemoteStore, RemoteStore, UpdateStockResponse};
pub use engine::{LedgerEngine, SaleReceipt};
pub use error::{AuthError, SyncError, SyncResult};
pub use session::SessionManager;
pub use status::{DbStatus, SyncStatusTracker};
