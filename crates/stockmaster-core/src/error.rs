//! # Error Types
//!
//! Domain-specific error types for stockmaster-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockmaster-core errors (this file)                                   │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockmaster-store errors (separate crate)                             │
//! │  └── StoreError       - Durable mirror failures                        │
//! │                                                                         │
//! │  stockmaster-sync errors (separate crate)                              │
//! │  ├── SyncError        - Remote store failures                          │
//! │  └── AuthError        - Credential / registration failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SyncError → CLI message           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, code, quantities)
//! 3. Errors are enum variants, never String
//! 4. Remote failures are NOT core errors: the ledger commits locally first
//!    and remote outcomes surface only through the sync status tracker

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are raised *before*
/// any mutation happens; once the ledger commits locally, nothing in this
/// enum can occur for that movement anymore.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the current mirror.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product has zero (or negative) stock and cannot be added to the cart.
    #[error("\"{name}\" is out of stock")]
    OutOfStock { name: String },

    /// A cart increment would exceed the product's currently mirrored stock.
    ///
    /// ## Note
    /// This is a *soft*, client-side check. Concurrent sales can still drive
    /// stock negative at the ledger level; the ledger itself is permissive.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The cart has no line for the given product.
    #[error("Product {0} is not in the cart")]
    LineNotFound(String),

    /// A scanned code did not resolve to any known SKU.
    ///
    /// The scanner is an untrusted collaborator: it may emit arbitrary text,
    /// so a miss is an expected outcome, not a bug.
    #[error("No product with SKU \"{code}\"")]
    UnrecognizedCode { code: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. They are raised
/// before any mutation is attempted and never involve a network round-trip.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Price cannot be negative (zero is allowed for free items).
    #[error("price cannot be negative")]
    NegativePrice,

    /// Invalid format (e.g. malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Password and confirmation do not match (registration).
    #[error("passwords do not match")]
    PasswordMismatch,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
