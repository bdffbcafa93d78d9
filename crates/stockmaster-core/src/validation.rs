//! # Validation Module
//!
//! Input validation for StockMaster.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / UI                                                      │
//! │  └── Immediate feedback, no mutation attempted                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any mutation or network round-trip)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote store (authoritative, e.g. duplicate email on          │
//! │           registration, unknown product on updateStock)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures are local-only: they are rejected before any state
//! changes and before anything touches the network.

use crate::error::ValidationError;
use crate::{MAX_NAME_LEN, MAX_SKU_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name: non-empty, bounded length.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a SKU.
///
/// The SKU is free text (it may come straight from a barcode scanner), so
/// the only rules are non-empty and bounded length. Uniqueness within an
/// account is intended but NOT enforced client-side.
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    Ok(())
}

/// Validates an email address. Deliberately shallow: the remote store is
/// authoritative for account identity, this only catches obvious typos.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a movement quantity: strictly positive. Direction lives in the
/// movement kind, never in the sign of the quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in paise: non-negative, zero allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::NegativePrice);
    }

    Ok(())
}

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates registration credentials before they reach the remote service.
///
/// A password/confirmation mismatch must never produce a network round-trip;
/// it is rejected here, locally.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirmation: &str,
) -> ValidationResult<()> {
    validate_email(email)?;

    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
