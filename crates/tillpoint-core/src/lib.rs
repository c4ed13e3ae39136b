//! # tillpoint-core: Pure Business Logic for Tillpoint
//!
//! Everything the point-of-sale client decides without touching the network
//! or the disk: who may open which page, what the cashier can sell and at
//! what price, what goes into a sale, and what to tell the user.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillpoint Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               apps/register (tillpoint binary)                  │   │
//! │  │      login ──► open page ──► catalog ──► sell ──► notices       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tillpoint-client                             │   │
//! │  │   Shell, SessionStore, ApiClient, services, CashierTerminal    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tillpoint-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ access  │ │ catalog │ │  cart   │ │  money  │ │ notice  │  │   │
//! │  │   │ guard   │ │  merge  │ │ totals  │ │  cents  │ │ values  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`access`] - Roles, route table, route guard, role router
//! - [`session`] - Session and login wire types
//! - [`catalog`] - Merge of shop stock, price adjustments and catalog
//! - [`cart`] - Stock-bounded cart and sale request building
//! - [`menu`] - Role-filtered navigation tree
//! - [`money`] - Integer money in two currencies
//! - [`notice`] - User-facing messages as values
//! - [`types`] - Backend wire types
//! - [`validation`] - Form and input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tillpoint_core::access::{check_access, paths, GuardDecision, Role};
//! use tillpoint_core::Session;
//!
//! let session = Session {
//!     token: Some("jwt".to_string()),
//!     roles: ["ROLE_CASHIER"].into_iter().collect(),
//!     ..Session::default()
//! };
//!
//! match check_access(&session, &[Role::Admin]) {
//!     GuardDecision::Deny(denial) => assert_eq!(denial.redirect_to, paths::CASHIER),
//!     GuardDecision::Allow => unreachable!(),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod menu;
pub mod money;
pub mod notice;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Role, RoleSet};
pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{merge_catalog, PriceSource, SellableLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money, PricePair};
pub use notice::{Notice, NoticeKind, WriteAction};
pub use session::{LoginRequest, LoginResponse, Session};
pub use types::*;
