//! # Cashier Terminal
//!
//! The sell screen: a merged sellable list for one shop plus an in-memory
//! cart.
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load()                                                                 │
//! │    │  remember the current Selection { shop_id, epoch }                 │
//! │    ▼                                                                    │
//! │  tokio::join!(shop stock, shop price adjustments, global catalog)       │
//! │    │  selection changed meanwhile ──► discarded (Stale), even on error  │
//! │    │  stock or catalog failed  ──► Error notice, old list kept          │
//! │    │  adjustments failed       ──► warn, merged without them            │
//! │    ▼                                                                    │
//! │  merge_catalog(...)                                                     │
//! │    │  selection changed meanwhile ──► result discarded (Stale)          │
//! │    ▼                                                                    │
//! │  list replaced                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! List, cart and selection share one `std::sync::Mutex`. It is taken only
//! between awaits; the fetches and the sale POST run with it released.
//!
//! The cart stays usable while a sale is in flight. Only one checkout runs at
//! a time, and a completed sale takes just the units it carried out of the
//! cart.

use std::sync::{Arc, Mutex, MutexGuard};

use tillpoint_core::catalog::{self, merge_catalog};
use tillpoint_core::{
    Cart, CartTotals, Notice, PaymentMethod, ProductId, SaleRecord, SellableLine, ShopId,
    WriteAction,
};
use tracing::{debug, info, warn};

use crate::api::ApiClient;

/// The shop selection a merge was issued for. The epoch moves on every
/// [`CashierTerminal::select_shop`], so two selections of the same shop
/// still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub shop_id: Option<ShopId>,
    pub epoch: u64,
}

/// What a [`CashierTerminal::load`] did with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { lines: usize },
    /// The shop changed while fetching; nothing was replaced.
    Stale,
}

#[derive(Debug)]
struct TerminalState {
    selection: Selection,
    lines: Vec<SellableLine>,
    cart: Cart,
    checkout_in_flight: bool,
}

pub struct CashierTerminal {
    api: Arc<ApiClient>,
    payment_method: PaymentMethod,
    state: Mutex<TerminalState>,
}

impl CashierTerminal {
    /// Opens the terminal on the session's shop.
    pub fn new(api: Arc<ApiClient>, payment_method: PaymentMethod) -> Self {
        let shop_id = api.session().snapshot().shop_id;
        CashierTerminal {
            api,
            payment_method,
            state: Mutex::new(TerminalState {
                selection: Selection { shop_id, epoch: 0 },
                lines: Vec::new(),
                cart: Cart::new(),
                checkout_in_flight: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TerminalState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut TerminalState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub fn selection(&self) -> Selection {
        self.lock().selection
    }

    /// Switches shops. The list and cart belong to the old shop, so both are
    /// emptied; any load still in flight becomes stale.
    pub fn select_shop(&self, shop_id: ShopId) -> Selection {
        self.with_state(|state| {
            state.selection = Selection {
                shop_id: Some(shop_id),
                epoch: state.selection.epoch + 1,
            };
            state.lines.clear();
            state.cart.clear();
            debug!(shop_id, epoch = state.selection.epoch, "Shop selected");
            state.selection
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetches and merges the sellable list for the current selection.
    pub async fn load(&self) -> Result<LoadOutcome, Notice> {
        let selection = self.selection();
        let shop_id = selection.shop_id.ok_or_else(Notice::no_shop_assigned)?;
        debug!(shop_id, epoch = selection.epoch, "Loading sellable list");

        let stock_service = self.api.stock();
        let products = self.api.products();
        let (stock, adjustments, catalog) = tokio::join!(
            stock_service.shop_stock(shop_id),
            products.adjustments_for_shop(shop_id),
            products.list(),
        );

        let current = self.selection();
        if current != selection {
            warn!(
                issued_for = ?selection,
                current = ?current,
                "Discarding catalog fetch for a previous selection"
            );
            return Ok(LoadOutcome::Stale);
        }

        let stock = stock.map_err(|e| e.load_notice("shop stock"))?;
        let catalog = catalog.map_err(|e| e.load_notice("products"))?;
        let adjustments = adjustments.unwrap_or_else(|e| {
            warn!(shop_id, error = %e, "Price adjustments unavailable, using catalog prices");
            Vec::new()
        });

        let merged = merge_catalog(shop_id, &stock, &adjustments, &catalog);
        Ok(self.install(selection, merged))
    }

    fn install(&self, issued_for: Selection, merged: Vec<SellableLine>) -> LoadOutcome {
        self.with_state(|state| {
            if state.selection != issued_for {
                warn!(
                    issued_for = ?issued_for,
                    current = ?state.selection,
                    "Discarding stale catalog merge"
                );
                return LoadOutcome::Stale;
            }
            let lines = merged.len();
            state.lines = merged;
            debug!(lines, "Sellable list replaced");
            LoadOutcome::Loaded { lines }
        })
    }

    pub fn lines(&self) -> Vec<SellableLine> {
        self.lock().lines.clone()
    }

    /// Lines whose product name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<SellableLine> {
        let state = self.lock();
        catalog::search(&state.lines, query)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of `product_id`; returns the line's new quantity.
    pub fn add(&self, product_id: ProductId) -> Result<i64, Notice> {
        self.with_state(|state| {
            let TerminalState { lines, cart, .. } = state;
            cart.add_from(lines, product_id).map_err(|e| {
                debug!(product_id, error = %e, "Add to cart rejected");
                Notice::from(e)
            })
        })
    }

    pub fn remove(&self, product_id: ProductId) -> bool {
        self.with_state(|state| state.cart.remove(product_id))
    }

    pub fn clear_cart(&self) {
        self.with_state(|state| state.cart.clear());
    }

    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// Totals recomputed from the current lines.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.lock().cart)
    }

    /// Submits the whole cart as one sale.
    ///
    /// An empty cart answers with an info notice and sends nothing, as does a
    /// second checkout while one is still in flight. On success the sold
    /// units leave the cart; anything added during the request stays. On
    /// failure the cart is left exactly as it was.
    pub async fn checkout(&self) -> Result<SaleRecord, Notice> {
        let cashier_id = self.api.session().snapshot().user_id;
        let (request, selection, shop_id, cashier_id) = self.with_state(|state| {
            if state.checkout_in_flight {
                debug!("Checkout already in flight");
                return Err(Notice::checkout_in_progress());
            }
            let request = state.cart.to_sale_request(self.payment_method)?;
            let shop_id = state.selection.shop_id.ok_or_else(Notice::no_shop_assigned)?;
            let cashier_id = cashier_id.ok_or_else(Notice::session_expired)?;
            state.checkout_in_flight = true;
            Ok::<_, Notice>((request, state.selection, shop_id, cashier_id))
        })?;

        let result = self.api.sales().create_sale(shop_id, cashier_id, &request).await;

        self.with_state(|state| {
            state.checkout_in_flight = false;
            match result {
                Ok(sale) => {
                    if state.selection == selection {
                        state.cart.settle(&request);
                    }
                    info!(
                        shop_id,
                        sale_id = ?sale.sale_id,
                        remaining = state.cart.lines.len(),
                        "Cart checked out"
                    );
                    Ok(sale)
                }
                Err(e) => {
                    warn!(shop_id, error = %e, "Checkout failed, cart kept");
                    Err(e.notice(WriteAction::Sale))
                }
            }
        })
    }
}
