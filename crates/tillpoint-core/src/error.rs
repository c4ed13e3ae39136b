//! # Error Types
//!
//! Domain-specific error types for tillpoint-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tillpoint-core errors (this file)                                     │
//! │  ├── CoreError        - Cart and catalog rule violations               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tillpoint-client errors (separate crate)                              │
//! │  └── ClientError      - Transport, auth, config, storage failures      │
//! │                                                                         │
//! │  Presentation                                                          │
//! │  └── Notice           - What the cashier sees (kind + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Notice              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the cart and catalog logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The product is not part of the merged catalog for this shop.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product has no stock in this shop.
    ///
    /// ## When This Occurs
    /// - Product is in the global catalog but not stocked by the shop
    /// - Shop stock line exists with quantity zero
    #[error("{product} is not in stock")]
    OutOfStock { product: String },

    /// Adding one more unit would exceed the known shop stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Sugar 2kg x3, shop stock = 3
    ///      │
    ///      ▼
    /// Click Sugar 2kg again
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Sugar 2kg", available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// UI shows: "Stock Alert: Not enough stock!"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any request leaves the client (login form, user form,
/// quantities).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Invalid format (e.g., unparsable date, malformed item spec).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A rule that ties several fields together was broken.
    #[error("{0}")]
    Rule(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
