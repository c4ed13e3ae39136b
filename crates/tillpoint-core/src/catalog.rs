//! # Catalog Merge
//!
//! Builds the cashier's sellable list from three backend reads.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shop stock lines ──┐                                                   │
//! │                     ├──► stocked lines with effective prices            │
//! │  price adjustments ─┘        (latest adjustment for this shop wins)     │
//! │                                                                         │
//! │  global catalog ───────► products not stocked here, quantity 0          │
//! │                                                                         │
//! │  ──► stable sort: positive stock first                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The merge is a pure function: the same inputs always give the same list
//! in the same order.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::money::PricePair;
use crate::types::{CatalogProduct, PriceAdjustment, ProductId, ShopId, ShopStockLine};

/// Where a line's displayed prices came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "camelCase")]
pub enum PriceSource {
    Catalog,
    Adjusted(Option<NaiveDateTime>),
}

/// One product the cashier can see, with the prices that will be charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellableLine {
    /// Product snapshot carrying the effective prices.
    pub product: CatalogProduct,
    pub catalog_prices: PricePair,
    pub quantity_in_stock: i64,
    pub in_shop: bool,
    pub price_source: PriceSource,
}

impl SellableLine {
    pub fn product_id(&self) -> ProductId {
        self.product.product_id
    }

    pub fn prices(&self) -> PricePair {
        self.product.prices()
    }

    pub fn is_sellable(&self) -> bool {
        self.quantity_in_stock > 0
    }
}

/// Merges stock, adjustments and the global catalog for `shop_id`.
pub fn merge_catalog(
    shop_id: ShopId,
    stock: &[ShopStockLine],
    adjustments: &[PriceAdjustment],
    catalog: &[CatalogProduct],
) -> Vec<SellableLine> {
    let latest = latest_adjustments(shop_id, adjustments);

    let mut seen: HashSet<ProductId> = HashSet::new();
    let mut lines: Vec<SellableLine> = Vec::with_capacity(stock.len() + catalog.len());

    for entry in stock {
        let Some(product) = entry.product.as_ref().filter(|p| p.is_resolvable()) else {
            continue;
        };
        if !seen.insert(product.product_id) {
            continue;
        }

        let catalog_prices = product.prices();
        let (effective, source) = match latest.get(&product.product_id) {
            Some(adj) => (
                adj.apply_to(catalog_prices),
                PriceSource::Adjusted(adj.adjustment_date),
            ),
            None => (catalog_prices, PriceSource::Catalog),
        };

        let mut snapshot = product.clone();
        snapshot.selling_price_usd = effective.usd;
        snapshot.selling_price_zwl = effective.zwl;

        lines.push(SellableLine {
            product: snapshot,
            catalog_prices,
            quantity_in_stock: entry.quantity_in_stock,
            in_shop: true,
            price_source: source,
        });
    }

    for product in catalog {
        if !seen.insert(product.product_id) {
            continue;
        }
        lines.push(SellableLine {
            product: product.clone(),
            catalog_prices: product.prices(),
            quantity_in_stock: 0,
            in_shop: false,
            price_source: PriceSource::Catalog,
        });
    }

    // sort_by_key is stable
    lines.sort_by_key(|line| !line.is_sellable());
    lines
}

/// Latest adjustment per product for this shop. Undated ones lose to dated
/// ones; among equal dates the earlier entry in the input wins.
fn latest_adjustments(
    shop_id: ShopId,
    adjustments: &[PriceAdjustment],
) -> HashMap<ProductId, &PriceAdjustment> {
    let mut matching: Vec<&PriceAdjustment> = adjustments
        .iter()
        .filter(|adj| adj.product_id().is_some() && adj.shop_id() == Some(shop_id))
        .collect();
    matching.sort_by(|a, b| b.adjustment_date.cmp(&a.adjustment_date));

    let mut latest = HashMap::new();
    for adj in matching {
        if let Some(product_id) = adj.product_id() {
            latest.entry(product_id).or_insert(adj);
        }
    }
    latest
}

/// Case-insensitive product-name filter. A blank query keeps everything.
pub fn search<'a>(lines: &'a [SellableLine], query: &str) -> Vec<&'a SellableLine> {
    let needle = query.trim().to_lowercase();
    lines
        .iter()
        .filter(|line| needle.is_empty() || line.product.product_name.to_lowercase().contains(&needle))
        .collect()
}

pub fn find_line(lines: &[SellableLine], product_id: ProductId) -> Option<&SellableLine> {
    lines.iter().find(|line| line.product_id() == product_id)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::*;
    use crate::money::Money;
    use crate::types::{ProductRef, ShopRef};

    pub const SHOP: ShopId = 1;

    pub fn product(id: ProductId, name: &str, usd_cents: i64) -> CatalogProduct {
        CatalogProduct {
            product_id: id,
            product_name: name.to_string(),
            category: None,
            unit: None,
            reorder_level: None,
            selling_price_usd: Money::from_cents(usd_cents),
            selling_price_zwl: Money::from_cents(usd_cents * 100),
            expiry_date: None,
        }
    }

    pub fn stock(product: CatalogProduct, quantity: i64) -> ShopStockLine {
        ShopStockLine {
            product: Some(product),
            quantity_in_stock: quantity,
            shop: Some(ShopRef {
                id: Some(SHOP),
                shop_name: Some("Main".to_string()),
            }),
        }
    }

    pub fn adjustment(
        product_id: ProductId,
        shop_id: Option<ShopId>,
        usd_cents: Option<i64>,
        day: u32,
    ) -> PriceAdjustment {
        PriceAdjustment {
            id: None,
            product: Some(ProductRef { product_id }),
            shop: shop_id.map(|id| ShopRef {
                id: Some(id),
                shop_name: None,
            }),
            new_price_usd: usd_cents.map(Money::from_cents),
            new_price_zwl: None,
            adjustment_date: NaiveDate::from_ymd_opt(2024, 5, day)
                .and_then(|d| d.and_hms_opt(9, 0, 0)),
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_later_adjustment_wins() {
        let stock = vec![stock(product(10, "Sugar 2kg", 250), 3)];
        let adjustments = vec![
            adjustment(10, Some(SHOP), Some(220), 1),
            adjustment(10, Some(SHOP), Some(200), 2),
        ];

        let lines = merge_catalog(SHOP, &stock, &adjustments, &[]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].prices().usd, Money::from_cents(200));
        assert_eq!(lines[0].catalog_prices.usd, Money::from_cents(250));
        assert!(matches!(lines[0].price_source, PriceSource::Adjusted(Some(_))));

        // Input order does not matter.
        let reversed: Vec<_> = adjustments.into_iter().rev().collect();
        let lines = merge_catalog(SHOP, &stock, &reversed, &[]);
        assert_eq!(lines[0].prices().usd, Money::from_cents(200));
    }

    #[test]
    fn test_null_adjusted_currency_falls_back() {
        let stock = vec![stock(product(10, "Sugar 2kg", 250), 3)];
        let adjustments = vec![adjustment(10, Some(SHOP), Some(199), 1)];

        let lines = merge_catalog(SHOP, &stock, &adjustments, &[]);
        assert_eq!(lines[0].prices().usd, Money::from_cents(199));
        assert_eq!(lines[0].prices().zwl, Money::from_cents(25_000));
    }

    #[test]
    fn test_other_shop_and_global_adjustments_ignored() {
        let stock = vec![stock(product(10, "Sugar 2kg", 250), 3)];
        let adjustments = vec![
            adjustment(10, Some(2), Some(100), 3),
            adjustment(10, None, Some(150), 4),
        ];

        let lines = merge_catalog(SHOP, &stock, &adjustments, &[]);
        assert_eq!(lines[0].prices().usd, Money::from_cents(250));
        assert_eq!(lines[0].price_source, PriceSource::Catalog);
    }

    #[test]
    fn test_unresolvable_stock_lines_dropped() {
        let nameless = stock(product(11, "", 100), 5);
        let orphan = ShopStockLine {
            product: None,
            quantity_in_stock: 4,
            shop: None,
        };

        let lines = merge_catalog(SHOP, &[nameless, orphan], &[], &[]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_catalog_products_appended_and_sorted() {
        let stock = vec![
            stock(product(1, "Bread", 120), 0),
            stock(product(2, "Milk", 90), 4),
        ];
        let catalog = vec![product(1, "Bread", 120), product(3, "Rice", 500)];

        let lines = merge_catalog(SHOP, &stock, &[], &catalog);
        let ids: Vec<_> = lines.iter().map(SellableLine::product_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let rice = find_line(&lines, 3).unwrap();
        assert!(!rice.in_shop);
        assert_eq!(rice.quantity_in_stock, 0);
        assert!(find_line(&lines, 1).unwrap().in_shop);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let stock = vec![
            stock(product(1, "Bread", 120), 2),
            stock(product(2, "Milk", 90), 0),
        ];
        let adjustments = vec![adjustment(1, Some(SHOP), Some(110), 1)];
        let catalog = vec![product(3, "Rice", 500), product(1, "Bread", 120)];

        let first = merge_catalog(SHOP, &stock, &adjustments, &catalog);
        let second = merge_catalog(SHOP, &stock, &adjustments, &catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = vec![product(1, "Brown Sugar", 100), product(2, "Milk", 90)];
        let lines = merge_catalog(SHOP, &[], &[], &catalog);

        assert_eq!(search(&lines, "SUGAR").len(), 1);
        assert_eq!(search(&lines, "  ").len(), 2);
        assert!(search(&lines, "tea").is_empty());
    }
}
