//! Role-filtered navigation tree.

use serde::Serialize;

use crate::access::{has_access, Role, RoleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub roles: &'static [Role],
    pub children: &'static [MenuEntry],
}

/// A menu entry the session may see, with its visible children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

use Role::{Admin as A, Cashier as C, Manager as M, SuperAdmin as SA, Supervisor as SUP};

const fn entry(label: &'static str, path: &'static str, roles: &'static [Role]) -> MenuEntry {
    MenuEntry {
        label,
        path,
        roles,
        children: &[],
    }
}

pub static MENU: &[MenuEntry] = &[
    entry("Dashboard", "/dashboard", &[A, SA]),
    entry("Shops", "/shops", &[A, SA]),
    MenuEntry {
        label: "Inventory",
        path: "/inventory",
        roles: &[A, SA, SUP],
        children: &[
            entry("Add Product", "/inventory/add", &[A, SA]),
            entry("Adjust Price", "/inventory/adjust-price", &[SUP, A, SA]),
            entry("Stock Adjustment", "/inventory/adjust-stock", &[A, SA]),
            entry("Stock Transfer", "/inventory/transfer", &[SUP]),
            entry("Shop Stock", "/inventory/shop-stock", &[SUP, A, SA]),
            entry("Stock Logs", "/inventory/logs", &[SUP, A, SA]),
        ],
    },
    MenuEntry {
        label: "Purchases",
        path: "/purchases",
        roles: &[SUP, A, SA],
        children: &[
            entry("Purchase Dashboard", "/purchases/dashboard", &[A, SA]),
            entry("Create PO", "/purchase-orders/create", &[SUP]),
            entry("Add Items", "/purchase-orders/items/add", &[SUP]),
            entry("Record Expenses", "/purchase-orders/expenses/add", &[SUP]),
            entry("View/Complete", "/purchase-orders", &[A, SA]),
        ],
    },
    MenuEntry {
        label: "Expenses",
        path: "/expenses",
        roles: &[A, SA, SUP, C],
        children: &[
            entry("Record", "/expenses/record", &[SUP, C]),
            entry("Create Category", "/expenses/create", &[A, SA]),
        ],
    },
    entry("Reports", "/reports", &[A, SA, M]),
    MenuEntry {
        label: "Settings",
        path: "/settings",
        roles: &[A, SA],
        children: &[entry("User Management", "/settings/users", &[A, SA])],
    },
    entry("Cashier POS", "/cashier", &[C]),
    entry("Sales History", "/sales/history", &[C, A, SA]),
];

/// Entries visible to `roles`. A parent shows when the session shares one of
/// its roles; its children are filtered the same way.
pub fn visible_menu(roles: &RoleSet) -> Vec<MenuItem> {
    filter(MENU, roles)
}

fn filter(entries: &'static [MenuEntry], roles: &RoleSet) -> Vec<MenuItem> {
    entries
        .iter()
        .filter(|e| has_access(roles, e.roles))
        .map(|e| MenuItem {
            label: e.label,
            path: e.path,
            children: filter(e.children, roles),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{resolve_route, Resolution};

    fn labels(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.label).collect()
    }

    #[test]
    fn test_cashier_menu() {
        let roles: RoleSet = ["ROLE_CASHIER"].into_iter().collect();
        let menu = visible_menu(&roles);
        assert_eq!(labels(&menu), vec!["Expenses", "Cashier POS", "Sales History"]);
        assert_eq!(labels(&menu[0].children), vec!["Record"]);
    }

    #[test]
    fn test_supervisor_sees_filtered_children() {
        let roles: RoleSet = ["ROLE_SUPERVISOR"].into_iter().collect();
        let menu = visible_menu(&roles);
        let purchases = menu.iter().find(|i| i.label == "Purchases").unwrap();
        assert_eq!(
            labels(&purchases.children),
            vec!["Create PO", "Add Items", "Record Expenses"]
        );
    }

    #[test]
    fn test_no_roles_no_menu() {
        assert!(visible_menu(&RoleSet::new()).is_empty());
    }

    #[test]
    fn test_every_menu_path_is_routable() {
        fn walk(entries: &[MenuEntry]) {
            for e in entries {
                assert_ne!(resolve_route(e.path), Resolution::Fallback, "{}", e.path);
                walk(e.children);
            }
        }
        walk(MENU);
    }
}
