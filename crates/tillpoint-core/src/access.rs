//! # Access Control
//!
//! Roles, the static route table, the route guard and the role router.
//!
//! ## Navigation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  navigate("/inventory")                                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  resolve_route() ──► Public ────────────────────────► render            │
//! │        │             RoleRedirect ─► landing_route() ─► navigate again  │
//! │        │             Fallback ─────► /login                            │
//! │        ▼                                                                │
//! │  Protected(required) ──► check_access(session, required)               │
//! │                               │                                         │
//! │            ┌──────────────────┼──────────────────────┐                  │
//! │            ▼                  ▼                      ▼                  │
//! │         Allow          Deny(no token)        Deny(no shared role)      │
//! │         render         /login                landing page or           │
//! │                        "Session Expired"     /unauthorized             │
//! │                                              "Access Denied"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Guard, router and menu all go through [`has_access`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::session::Session;

// =============================================================================
// Roles
// =============================================================================

/// A role tag as the backend issues it.
///
/// Unknown tags are kept verbatim so they round-trip through session storage;
/// they only ever match themselves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SuperAdmin,
    Admin,
    Supervisor,
    Cashier,
    Manager,
    Other(String),
}

impl Role {
    pub fn as_tag(&self) -> &str {
        match self {
            Role::SuperAdmin => "ROLE_SUPERADMIN",
            Role::Admin => "ROLE_ADMIN",
            Role::Supervisor => "ROLE_SUPERVISOR",
            Role::Cashier => "ROLE_CASHIER",
            Role::Manager => "ROLE_MANAGER",
            Role::Other(tag) => tag,
        }
    }

    /// Tag without the `ROLE_` prefix, for display.
    pub fn label(&self) -> &str {
        let tag = self.as_tag();
        tag.strip_prefix("ROLE_").unwrap_or(tag)
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ROLE_SUPERADMIN" => Role::SuperAdmin,
            "ROLE_ADMIN" => Role::Admin,
            "ROLE_SUPERVISOR" => Role::Supervisor,
            "ROLE_CASHIER" => Role::Cashier,
            "ROLE_MANAGER" => Role::Manager,
            _ => Role::Other(tag),
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Role::from(tag.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(tag) => tag,
            known => known.as_tag().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// The roles held by one session. Serializes as a JSON array of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new() -> Self {
        RoleSet(BTreeSet::new())
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    /// Comma-separated labels ("ADMIN, CASHIER").
    pub fn labels(&self) -> String {
        self.0.iter().map(Role::label).collect::<Vec<_>>().join(", ")
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        RoleSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for RoleSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Role::from).collect()
    }
}

/// True when `required` is empty or shares at least one role with the session.
pub fn has_access(session_roles: &RoleSet, required: &[Role]) -> bool {
    required.is_empty() || required.iter().any(|role| session_roles.contains(role))
}

// =============================================================================
// Route Table
// =============================================================================

pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const REDIRECT: &str = "/redirect";
    pub const UNAUTHORIZED: &str = "/unauthorized";
    pub const DASHBOARD: &str = "/dashboard";
    pub const SHOPS: &str = "/shops";
    pub const INVENTORY: &str = "/inventory";
    pub const PURCHASES: &str = "/purchases";
    pub const CASHIER: &str = "/cashier";
    pub const SALES_HISTORY: &str = "/sales/history";
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// No session needed.
    Public,
    /// Sends the session to its landing page.
    RoleRedirect,
    /// Needs a token; an empty slice admits any authenticated session.
    Protected(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path pattern; segments starting with `:` match any single segment.
    pub path: &'static str,
    pub title: &'static str,
    pub access: RouteAccess,
}

impl RouteDescriptor {
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = self.path.split('/');
        let mut actual = path.split('/');
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') && !a.is_empty() => {}
                (Some(p), Some(a)) if p == a => {}
                _ => return false,
            }
        }
    }

    pub fn required_roles(&self) -> &'static [Role] {
        match self.access {
            RouteAccess::Protected(roles) => roles,
            _ => &[],
        }
    }
}

use Role::{Admin as A, Cashier as C, Manager as M, SuperAdmin as SA, Supervisor as SUP};

const fn protected(
    path: &'static str,
    title: &'static str,
    roles: &'static [Role],
) -> RouteDescriptor {
    RouteDescriptor {
        path,
        title,
        access: RouteAccess::Protected(roles),
    }
}

/// Every page the application knows about.
pub static ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: paths::LOGIN,
        title: "Login",
        access: RouteAccess::Public,
    },
    RouteDescriptor {
        path: paths::UNAUTHORIZED,
        title: "Unauthorized",
        access: RouteAccess::Public,
    },
    RouteDescriptor {
        path: paths::REDIRECT,
        title: "Redirect",
        access: RouteAccess::RoleRedirect,
    },
    protected(paths::DASHBOARD, "Dashboard", &[A, SA]),
    protected(paths::SHOPS, "Shops", &[A, SA]),
    protected(paths::INVENTORY, "Inventory", &[A, SA]),
    protected("/inventory/add", "Add Product", &[A, SA]),
    protected("/inventory/adjust-price", "Adjust Price", &[SUP, A, SA]),
    protected("/inventory/adjust-stock", "Stock Adjustment", &[A, SA]),
    protected("/inventory/transfer", "Stock Transfer", &[SUP, A]),
    protected("/inventory/logs", "Stock Logs", &[SUP, A, SA]),
    protected("/inventory/shop-stock", "Shop Stock", &[SUP, A, SA]),
    protected(paths::PURCHASES, "Purchases", &[SUP]),
    protected("/purchases/dashboard", "Purchase Dashboard", &[A, SA]),
    protected("/purchase-orders", "Purchase Orders", &[A, SA]),
    protected("/purchase-orders/dashboard", "Purchase Order Dashboard", &[SUP]),
    protected("/purchase-orders/create", "Create Purchase Order", &[SUP]),
    protected("/purchase-orders/items/add", "Add Purchase Order Items", &[SUP]),
    protected("/purchase-orders/expenses/add", "Record Purchase Expenses", &[SUP]),
    protected("/expenses", "Expenses", &[A, SA, SUP, C]),
    protected("/expenses/record", "Record Expense", &[SUP, C]),
    protected("/expenses/create", "Create Expense Category", &[A, SA]),
    protected("/reports", "Reports", &[A, SA, M]),
    protected("/settings", "Settings", &[A, SA]),
    protected("/settings/users", "User Management", &[A, SA]),
    protected(paths::CASHIER, "Cashier", &[C]),
    protected(paths::SALES_HISTORY, "Sales History", &[C, A, SA]),
    protected("/sales/:saleId", "Sale Details", &[C]),
];

/// What a path resolves to before the guard runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Route(&'static RouteDescriptor),
    /// Unknown path or `/`; always ends up at the login page.
    Fallback,
}

/// Looks a path up in [`ROUTES`], ignoring any query string or trailing slash.
pub fn resolve_route(path: &str) -> Resolution {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Resolution::Fallback;
    }

    // Literal routes win over parameterised ones ("/sales/history" vs "/sales/:saleId").
    ROUTES
        .iter()
        .find(|r| r.path == trimmed)
        .or_else(|| ROUTES.iter().find(|r| r.matches(trimmed)))
        .map(Resolution::Route)
        .unwrap_or(Resolution::Fallback)
}

// =============================================================================
// Role Router
// =============================================================================

/// Landing page for a session, first match wins.
pub fn landing_route(session: &Session) -> &'static str {
    if !session.is_authenticated() {
        return paths::LOGIN;
    }
    role_landing(&session.roles).unwrap_or(paths::UNAUTHORIZED)
}

fn role_landing(roles: &RoleSet) -> Option<&'static str> {
    if has_access(roles, &[SA, A]) {
        Some(paths::DASHBOARD)
    } else if has_access(roles, &[SUP]) {
        Some(paths::PURCHASES)
    } else if has_access(roles, &[C]) {
        Some(paths::CASHIER)
    } else {
        None
    }
}

// =============================================================================
// Route Guard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotAuthenticated,
    NotAuthorized,
}

/// Where a denied navigation goes instead, and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenialReason,
    pub redirect_to: &'static str,
    pub notice: Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny(Denial),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Decides whether the session may open a page requiring `required`.
pub fn check_access(session: &Session, required: &[Role]) -> GuardDecision {
    if !session.is_authenticated() {
        return GuardDecision::Deny(Denial {
            reason: DenialReason::NotAuthenticated,
            redirect_to: paths::LOGIN,
            notice: Notice::session_expired(),
        });
    }

    if has_access(&session.roles, required) {
        return GuardDecision::Allow;
    }

    GuardDecision::Deny(Denial {
        reason: DenialReason::NotAuthorized,
        redirect_to: role_landing(&session.roles).unwrap_or(paths::UNAUTHORIZED),
        notice: Notice::access_denied(),
    })
}

/// Runs `render` only when the guard allows the page.
pub fn guard<T>(
    session: &Session,
    required: &[Role],
    render: impl FnOnce() -> T,
) -> Result<T, Denial> {
    match check_access(session, required) {
        GuardDecision::Allow => Ok(render()),
        GuardDecision::Deny(denial) => Err(denial),
    }
}
