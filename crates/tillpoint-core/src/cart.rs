//! # Cart
//!
//! The cashier's in-memory cart, bounded by the shop stock known when each
//! unit was added.
//!
//! ## Line Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   absent ──add──► present(1) ──add──► present(n+1)   (n+1 ≤ stock)      │
//! │     ▲                 │                    │                            │
//! │     └──── remove ─────┴──── remove ────────┤                            │
//! │     └──────────── settle after checkout ───┘  (sold units only)         │
//! │                                                                         │
//! │  Stock is never reserved here; only the backend decrements it.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::SellableLine;
use crate::error::{CoreError, CoreResult};
use crate::money::{Currency, Money, PricePair};
use crate::types::{
    CatalogProduct, PaymentMethod, ProductId, ProductRef, SaleItemRequest, SaleRequest,
};

/// A product in the cart.
///
/// ## Design Notes
/// `product` is a frozen snapshot with the effective prices at add time, so a
/// reload of the catalog does not reprice what is already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: CatalogProduct,
    pub quantity: i64,
    /// Stock seen when the line was last incremented.
    pub quantity_in_stock: i64,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId {
        self.product.product_id
    }

    pub fn unit_prices(&self) -> PricePair {
        self.product.prices()
    }

    /// Unit prices × quantity, per currency.
    pub fn line_total(&self) -> PricePair {
        self.unit_prices().multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding again increments quantity)
/// - `quantity` is between 1 and the line's `quantity_in_stock`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a sellable line.
    ///
    /// ## Behavior
    /// - No stock: `OutOfStock`, nothing changes
    /// - Already in cart and one more would exceed stock: `InsufficientStock`,
    ///   quantity unchanged
    /// - Already in cart otherwise: quantity + 1
    /// - Not in cart: new line with quantity 1
    ///
    /// Returns the new quantity of the line.
    pub fn add(&mut self, line: &SellableLine) -> CoreResult<i64> {
        let stock = line.quantity_in_stock;
        if stock <= 0 {
            return Err(CoreError::OutOfStock {
                product: line.product.product_name.clone(),
            });
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id() == line.product_id())
        {
            let requested = existing.quantity + 1;
            if requested > stock {
                return Err(CoreError::InsufficientStock {
                    product: line.product.product_name.clone(),
                    available: stock,
                    requested,
                });
            }
            existing.quantity = requested;
            existing.quantity_in_stock = stock;
            return Ok(requested);
        }

        self.lines.push(CartLine {
            product: line.product.clone(),
            quantity: 1,
            quantity_in_stock: stock,
        });
        Ok(1)
    }

    /// Looks `product_id` up in the merged list, then adds it.
    pub fn add_from(&mut self, lines: &[SellableLine], product_id: ProductId) -> CoreResult<i64> {
        let line = crate::catalog::find_line(lines, product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        self.add(line)
    }

    /// Deletes the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id() != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Takes the units of a completed sale out of the cart. Lines added or
    /// incremented after `sold` was built keep their extra units; a line
    /// with nothing left is dropped.
    pub fn settle(&mut self, sold: &SaleRequest) {
        for item in &sold.sale_items {
            if let Some(line) = self
                .lines
                .iter_mut()
                .find(|l| l.product_id() == item.product.product_id)
            {
                line.quantity -= item.quantity;
            }
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id() == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Per-currency totals, recomputed on every call.
    pub fn totals(&self) -> PricePair {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn total_in(&self, currency: Currency) -> Money {
        self.totals().get(currency)
    }

    /// Builds the sale submission for the whole cart.
    pub fn to_sale_request(&self, payment_method: PaymentMethod) -> CoreResult<SaleRequest> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        Ok(SaleRequest {
            payment_method,
            sale_items: self
                .lines
                .iter()
                .map(|l| SaleItemRequest {
                    product: ProductRef {
                        product_id: l.product_id(),
                    },
                    quantity: l.quantity,
                })
                .collect(),
        })
    }
}

/// Cart summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub usd: Money,
    pub zwl: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        CartTotals {
            item_count: cart.lines.len(),
            total_quantity: cart.total_quantity(),
            usd: totals.usd,
            zwl: totals.zwl,
        }
    }
}
