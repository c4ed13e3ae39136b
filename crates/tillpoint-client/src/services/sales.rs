//! Sales submission and history (`/sales`).

use chrono::NaiveDate;
use tillpoint_core::{SaleRecord, SaleRequest, ShopId, UserId};
use tracing::info;

use super::Collection;
use crate::api::ApiClient;
use crate::error::ClientResult;

pub struct SalesService<'a> {
    api: &'a ApiClient,
    sales: Collection<'a, SaleRecord>,
}

fn day_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl<'a> SalesService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        SalesService {
            api,
            sales: Collection::new(api, "/sales"),
        }
    }

    /// Submits one sale; totals, cost and profit come back from the backend.
    pub async fn create_sale(
        &self,
        shop_id: ShopId,
        cashier_id: UserId,
        request: &SaleRequest,
    ) -> ClientResult<SaleRecord> {
        let sale: SaleRecord = self
            .api
            .post(&format!("/sales/{}/{}", shop_id, cashier_id), request)
            .await?;
        info!(
            shop_id,
            cashier_id,
            sale_id = ?sale.sale_id,
            lines = request.sale_items.len(),
            payment = %request.payment_method,
            "Sale completed"
        );
        Ok(sale)
    }

    pub async fn list(&self) -> ClientResult<Vec<SaleRecord>> {
        self.sales.list().await
    }

    pub async fn get(&self, id: i64) -> ClientResult<SaleRecord> {
        self.sales.get(id).await
    }

    pub async fn by_shop(&self, shop_id: ShopId) -> ClientResult<Vec<SaleRecord>> {
        self.api.get(&format!("/sales/shop/{}", shop_id)).await
    }

    pub async fn shop_daily(&self, shop_id: ShopId, date: NaiveDate) -> ClientResult<Vec<SaleRecord>> {
        self.api
            .get_query(
                &format!("/sales/shop/{}/daily", shop_id),
                &[("date", day_param(date))],
            )
            .await
    }

    /// One cashier's sales for a day.
    pub async fn cashier_daily(&self, user_id: UserId, date: NaiveDate) -> ClientResult<Vec<SaleRecord>> {
        self.api
            .get_query(
                &format!("/sales/user/{}/daily", user_id),
                &[("date", day_param(date))],
            )
            .await
    }

    /// Sales between two days, both inclusive.
    pub async fn range(&self, start: NaiveDate, end: NaiveDate) -> ClientResult<Vec<SaleRecord>> {
        self.api
            .get_query(
                "/sales/range",
                &[("start", day_param(start)), ("end", day_param(end))],
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.sales.delete(id).await
    }
}
