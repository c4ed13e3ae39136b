//! # Notices
//!
//! User-facing messages returned as values. Business logic never displays
//! anything; it hands a `Notice` back and the presentation layer decides
//! whether that is a toast, a dialog or a log line.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation ──► Result<T, Notice> ──► Presentation layer                 │
//! │                                                                         │
//! │  timeout = Some(..)  → non-blocking toast that dismisses itself        │
//! │  timeout = None      → blocking dialog the user must acknowledge       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A message for the user: kind, title, text, and whether it times out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub timeout: Option<Duration>,
}

/// Which write a backend rejection came from, for picking a specific notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Sale,
    StockTransfer,
    StockAdjustment,
    PriceAdjustment,
    ShopSave,
    ExpenseCategorySave,
    ExpenseSave,
    UserSave,
    PurchaseOrderSave,
}

impl WriteAction {
    /// Verb phrase used in generic failure text ("Failed to save shop").
    pub fn label(&self) -> &'static str {
        match self {
            WriteAction::Sale => "complete sale",
            WriteAction::StockTransfer => "create stock transfer",
            WriteAction::StockAdjustment => "adjust stock",
            WriteAction::PriceAdjustment => "adjust price",
            WriteAction::ShopSave => "save shop",
            WriteAction::ExpenseCategorySave => "save category",
            WriteAction::ExpenseSave => "record expense",
            WriteAction::UserSave => "save user",
            WriteAction::PurchaseOrderSave => "save purchase order",
        }
    }
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            kind,
            title: title.into(),
            message: message.into(),
            timeout: None,
        }
    }

    /// Turns the notice into a self-dismissing toast.
    pub fn timed(mut self, millis: u64) -> Self {
        self.timeout = Some(Duration::from_millis(millis));
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.timeout.is_none()
    }

    // =========================================================================
    // Session & Access
    // =========================================================================

    pub fn session_expired() -> Self {
        Notice::new(
            NoticeKind::Warning,
            "Session Expired",
            "Please log in again to continue.",
        )
        .timed(2000)
    }

    pub fn access_denied() -> Self {
        Notice::new(
            NoticeKind::Error,
            "Access Denied",
            "You are not authorized to view this page.",
        )
        .timed(2500)
    }

    pub fn welcome(full_name: &str) -> Self {
        Notice::new(
            NoticeKind::Success,
            "Welcome",
            format!("Logged in as {}", full_name),
        )
        .timed(1200)
    }

    pub fn login_failed(detail: Option<&str>) -> Self {
        let message = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Invalid username or password.");
        Notice::new(NoticeKind::Error, "Login Failed", message)
    }

    pub fn logged_out() -> Self {
        Notice::new(NoticeKind::Info, "Logged Out", "You have been signed out.").timed(1500)
    }

    // =========================================================================
    // Cashier Terminal
    // =========================================================================

    pub fn out_of_stock() -> Self {
        Notice::new(NoticeKind::Warning, "Stock Alert", "Product not in stock!")
    }

    pub fn not_enough_stock() -> Self {
        Notice::new(NoticeKind::Warning, "Stock Alert", "Not enough stock!")
    }

    pub fn empty_cart() -> Self {
        Notice::new(NoticeKind::Info, "Notice", "Cart is empty.")
    }

    pub fn checkout_in_progress() -> Self {
        Notice::new(NoticeKind::Info, "Notice", "A sale is already being processed.")
    }

    pub fn sale_completed() -> Self {
        Notice::new(NoticeKind::Success, "Success", "Sale completed successfully!")
    }

    pub fn no_shop_assigned() -> Self {
        Notice::new(NoticeKind::Error, "Error", "No shop assigned to this user!")
    }

    // =========================================================================
    // Backend Failures
    // =========================================================================

    /// A read failed; the page keeps whatever it already shows.
    pub fn load_failed(resource: &str) -> Self {
        Notice::new(
            NoticeKind::Error,
            "Error",
            format!("Failed to load {}.", resource),
        )
    }

    /// A write was rejected by the backend or never reached it.
    ///
    /// Domain rules the backend enforces are recognised from the status and
    /// message text so the user gets a specific explanation; anything else
    /// falls back to a generic error carrying the backend text.
    pub fn write_failed(action: WriteAction, status: Option<u16>, message: &str) -> Self {
        let lowered = message.to_lowercase();

        if lowered.contains("insufficient") || lowered.contains("not enough stock") {
            let text = match action {
                WriteAction::StockTransfer => {
                    "The source shop does not have enough stock for this transfer. Please adjust the quantity."
                }
                _ => "There is not enough stock to complete this operation.",
            };
            return Notice::new(NoticeKind::Warning, "Insufficient Stock", text);
        }

        match (action, status) {
            (WriteAction::ShopSave, Some(400) | Some(409)) => Notice::new(
                NoticeKind::Warning,
                "Duplicate Shop",
                "A shop with this name already exists!",
            ),
            (WriteAction::ExpenseCategorySave, Some(500)) => Notice::new(
                NoticeKind::Warning,
                "Duplicate!",
                "Category name already exists.",
            ),
            (WriteAction::Sale, _) => Notice::new(
                NoticeKind::Error,
                "Error",
                "Failed to complete sale.",
            ),
            _ if message.trim().is_empty() => Notice::new(
                NoticeKind::Error,
                "Error",
                format!("Failed to {}.", action.label()),
            ),
            _ => Notice::new(
                NoticeKind::Error,
                "Error",
                format!("Failed to {}: {}", action.label(), message),
            ),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Cart and validation failures as the cashier sees them.
impl From<&CoreError> for Notice {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => {
                Notice::new(NoticeKind::Error, "Error", "Product not found.")
            }
            CoreError::OutOfStock { .. } => Notice::out_of_stock(),
            CoreError::InsufficientStock { .. } => Notice::not_enough_stock(),
            CoreError::EmptyCart => Notice::empty_cart(),
            CoreError::Validation(e) => {
                Notice::new(NoticeKind::Warning, "Missing Info", e.to_string())
            }
        }
    }
}

impl From<CoreError> for Notice {
    fn from(err: CoreError) -> Self {
        Notice::from(&err)
    }
}
