//! Text rendering for notices, menus, sellable lines and the cart.

use std::fmt::Write as _;

use tillpoint_client::config::TerminalSettings;
use tillpoint_core::menu::MenuItem;
use tillpoint_core::{Cart, Currency, Notice, NoticeKind, SellableLine, Session};

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Info => "info",
        NoticeKind::Warning => "warning",
        NoticeKind::Error => "error",
    };
    format!("[{}] {}", tag, notice)
}

/// Prints a notice: warnings and errors to stderr, the rest to stdout.
pub fn show(n: &Notice) {
    match n.kind {
        NoticeKind::Warning | NoticeKind::Error => eprintln!("{}", notice(n)),
        NoticeKind::Success | NoticeKind::Info => println!("{}", notice(n)),
    }
}

pub fn session(session: &Session) -> String {
    if !session.is_authenticated() {
        return "Not logged in.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "User:  {}", session.display_name());
    if let Some(username) = &session.username {
        let _ = writeln!(out, "Login: {}", username);
    }
    let _ = writeln!(out, "Roles: {}", session.roles.labels());
    match (&session.shop_name, session.shop_id) {
        (Some(name), Some(id)) => {
            let _ = write!(out, "Shop:  {} (#{})", name, id);
        }
        (None, Some(id)) => {
            let _ = write!(out, "Shop:  #{}", id);
        }
        _ => {
            let _ = write!(out, "Shop:  none");
        }
    }
    out
}

pub fn menu(items: &[MenuItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{:<24} {}", item.label, item.path);
        for child in &item.children {
            let _ = writeln!(out, "  {:<22} {}", child.label, child.path);
        }
    }
    out
}

pub fn lines(settings: &TerminalSettings, lines: &[&SellableLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<28} {:>6}  {:>12}  {:>14}",
        "ID", "PRODUCT", "STOCK", "USD", "ZWL"
    );
    for line in lines {
        let prices = line.prices();
        let _ = writeln!(
            out,
            "{:>6}  {:<28} {:>6}  {:>12}  {:>14}",
            line.product_id(),
            line.product.product_name,
            line.quantity_in_stock,
            settings.format_money(prices.usd, Currency::Usd),
            settings.format_money(prices.zwl, Currency::Zwl),
        );
    }
    out
}

pub fn cart(settings: &TerminalSettings, cart: &Cart) -> String {
    let mut out = String::new();
    for line in &cart.lines {
        let _ = writeln!(
            out,
            "{:>4} x {:<28} {:>12}",
            line.quantity,
            line.product.product_name,
            settings.format_money(line.line_total().usd, Currency::Usd),
        );
    }
    let totals = cart.totals();
    let _ = write!(
        out,
        "Total: {} / {}",
        settings.format_money(totals.usd, Currency::Usd),
        settings.format_money(totals.zwl, Currency::Zwl),
    );
    out
}
