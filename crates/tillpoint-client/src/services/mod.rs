//! # Domain Services
//!
//! Thin typed wrappers over the backend's REST resources. Each service
//! borrows the gateway client, so every call gets the bearer token and the
//! 401 handling for free.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  api.shops()            /shops                                          │
//! │  api.products()         /products, /pricing-adjustments                 │
//! │  api.stock()            /shop-stock, /stocks, /stock-transfers          │
//! │  api.purchasing()       /purchase-orders, /purchase-order-items         │
//! │  api.expenses()         /expenses, /expense-categories                  │
//! │  api.users()            /users                                          │
//! │  api.sales()            /sales                                          │
//! │  api.auth()             /users/login                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Most resources follow the same collection pattern, which [`Collection`]
//! implements once: `GET/POST /resource`, `GET/PUT/DELETE /resource/{id}`.

use std::fmt::Display;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::ClientResult;

pub mod auth;
pub mod expenses;
pub mod products;
pub mod purchasing;
pub mod sales;
pub mod shops;
pub mod stock;
pub mod users;

pub use auth::AuthService;
pub use expenses::{Expense, ExpenseCategory, ExpenseDraft, ExpenseService, ExpenseType};
pub use products::{PriceUpdate, ProductDraft, ProductService};
pub use purchasing::{
    PurchaseOrder, PurchaseOrderDraft, PurchaseOrderItem, PurchaseOrderItemDraft,
    PurchaseOrderStatus, PurchasingService,
};
pub use sales::SalesService;
pub use shops::{Shop, ShopService};
pub use stock::{StockAdjustment, StockService, StockTransfer, TransferRequest};
pub use users::{UserRecord, UserService};

/// `{ "id": n }` reference used in request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// Conventional REST collection rooted at `base`.
pub struct Collection<'a, T> {
    api: &'a ApiClient,
    base: &'static str,
    _record: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Collection<'a, T> {
    pub fn new(api: &'a ApiClient, base: &'static str) -> Self {
        Collection {
            api,
            base,
            _record: PhantomData,
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<T>> {
        self.api.get(self.base).await
    }

    pub async fn get(&self, id: impl Display) -> ClientResult<T> {
        self.api.get(&format!("{}/{}", self.base, id)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> ClientResult<T> {
        self.api.post(self.base, body).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, body: &B) -> ClientResult<T> {
        self.api.put(&format!("{}/{}", self.base, id), body).await
    }

    pub async fn delete(&self, id: impl Display) -> ClientResult<()> {
        self.api.delete(&format!("{}/{}", self.base, id)).await
    }
}

impl ApiClient {
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn shops(&self) -> ShopService<'_> {
        ShopService::new(self)
    }

    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(self)
    }

    pub fn stock(&self) -> StockService<'_> {
        StockService::new(self)
    }

    pub fn purchasing(&self) -> PurchasingService<'_> {
        PurchasingService::new(self)
    }

    pub fn expenses(&self) -> ExpenseService<'_> {
        ExpenseService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn sales(&self) -> SalesService<'_> {
        SalesService::new(self)
    }
}
