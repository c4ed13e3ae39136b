//! Purchase orders, their items and their expenses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tillpoint_core::money::decimal;
use tillpoint_core::types::{wire_date, ShopRef};
use tillpoint_core::validation::{validate_name, validate_quantity};
use tillpoint_core::{Money, ProductRef, ShopId};
use tracing::info;

use super::expenses::Expense;
use super::{Collection, IdRef};
use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    #[serde(default, alias = "id")]
    pub purchase_order_id: Option<i64>,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default, with = "wire_date::timestamp_option")]
    pub order_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: PurchaseOrderStatus,
    #[serde(default)]
    pub shop: Option<ShopRef>,
}

/// Body for `POST /purchase-orders`; new orders always start pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDraft {
    pub supplier_name: String,
    #[serde(with = "wire_date::timestamp_option")]
    pub order_date: Option<NaiveDateTime>,
    pub status: PurchaseOrderStatus,
    pub shop: IdRef,
}

impl PurchaseOrderDraft {
    pub fn new(supplier_name: &str, shop_id: ShopId, order_date: NaiveDateTime) -> Self {
        PurchaseOrderDraft {
            supplier_name: supplier_name.trim().to_string(),
            order_date: Some(order_date),
            status: PurchaseOrderStatus::Pending,
            shop: IdRef { id: shop_id },
        }
    }
}

/// `{ "purchaseOrderId": n }` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub purchase_order_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItem {
    #[serde(default, alias = "itemId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(rename = "unitPurchasePriceUSD", default, with = "decimal")]
    pub unit_purchase_price_usd: Money,
    #[serde(rename = "unitPurchasePriceZWL", default, with = "decimal")]
    pub unit_purchase_price_zwl: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItemDraft {
    pub purchase_order: OrderRef,
    pub product: ProductRef,
    pub quantity: i64,
    #[serde(rename = "unitPurchasePriceUSD", with = "decimal")]
    pub unit_purchase_price_usd: Money,
    #[serde(rename = "unitPurchasePriceZWL", with = "decimal")]
    pub unit_purchase_price_zwl: Money,
}

pub struct PurchasingService<'a> {
    api: &'a ApiClient,
    orders: Collection<'a, PurchaseOrder>,
    items: Collection<'a, PurchaseOrderItem>,
}

impl<'a> PurchasingService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        PurchasingService {
            api,
            orders: Collection::new(api, "/purchase-orders"),
            items: Collection::new(api, "/purchase-order-items"),
        }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn orders(&self) -> ClientResult<Vec<PurchaseOrder>> {
        self.orders.list().await
    }

    pub async fn order(&self, id: i64) -> ClientResult<PurchaseOrder> {
        self.orders.get(id).await
    }

    pub async fn orders_for_shop(&self, shop_id: ShopId) -> ClientResult<Vec<PurchaseOrder>> {
        self.api.get(&format!("/purchase-orders/shop/{}", shop_id)).await
    }

    pub async fn create_order(&self, draft: &PurchaseOrderDraft) -> ClientResult<PurchaseOrder> {
        validate_name("supplier name", &draft.supplier_name)?;
        let order = self.orders.create(draft).await?;
        info!(supplier = %draft.supplier_name, shop_id = draft.shop.id, "Purchase order created");
        Ok(order)
    }

    pub async fn update_order(&self, id: i64, order: &PurchaseOrder) -> ClientResult<PurchaseOrder> {
        self.orders.update(id, order).await
    }

    pub async fn delete_order(&self, id: i64) -> ClientResult<()> {
        self.orders.delete(id).await
    }

    /// Asks the backend to draft orders for everything below reorder level.
    pub async fn auto_generate(&self) -> ClientResult<serde_json::Value> {
        self.api.post_query("/purchase-orders/auto-generate", &[]).await
    }

    pub async fn order_expenses(&self, order_id: i64) -> ClientResult<Vec<Expense>> {
        self.api
            .get(&format!("/purchase-orders/{}/expenses", order_id))
            .await
    }

    pub async fn order_expenses_total(&self, order_id: i64) -> ClientResult<serde_json::Value> {
        self.api
            .get(&format!("/purchase-orders/{}/expenses/total", order_id))
            .await
    }

    pub async fn landing_cost(&self, order_id: i64) -> ClientResult<serde_json::Value> {
        self.api
            .get(&format!("/purchase-orders/{}/landing-cost", order_id))
            .await
    }

    pub async fn complete(&self, order_id: i64) -> ClientResult<PurchaseOrder> {
        let order = self
            .api
            .patch_query(&format!("/purchase-orders/{}/complete", order_id), &[])
            .await?;
        info!(order_id, "Purchase order completed");
        Ok(order)
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub async fn items(&self) -> ClientResult<Vec<PurchaseOrderItem>> {
        self.items.list().await
    }

    pub async fn item(&self, id: i64) -> ClientResult<PurchaseOrderItem> {
        self.items.get(id).await
    }

    pub async fn items_for_order(&self, order_id: i64) -> ClientResult<Vec<PurchaseOrderItem>> {
        self.api
            .get(&format!("/purchase-order-items/order/{}", order_id))
            .await
    }

    pub async fn add_item(&self, draft: &PurchaseOrderItemDraft) -> ClientResult<PurchaseOrderItem> {
        validate_quantity("quantity", draft.quantity)?;
        self.items.create(draft).await
    }

    pub async fn update_item(
        &self,
        id: i64,
        draft: &PurchaseOrderItemDraft,
    ) -> ClientResult<PurchaseOrderItem> {
        validate_quantity("quantity", draft.quantity)?;
        self.items.update(id, draft).await
    }

    pub async fn delete_item(&self, id: i64) -> ClientResult<()> {
        self.items.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_order_draft_wire_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 15)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();
        let draft = PurchaseOrderDraft::new(" Acme Foods ", 2, date);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "supplierName": "Acme Foods",
                "orderDate": "2024-05-15T10:30:00",
                "status": "PENDING",
                "shop": { "id": 2 }
            })
        );
    }

    #[test]
    fn test_item_draft_wire_shape() {
        let draft = PurchaseOrderItemDraft {
            purchase_order: OrderRef { purchase_order_id: 7 },
            product: ProductRef { product_id: 10 },
            quantity: 24,
            unit_purchase_price_usd: Money::from_cents(180),
            unit_purchase_price_zwl: Money::zero(),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["purchaseOrder"]["purchaseOrderId"], 7);
        assert_eq!(json["unitPurchasePriceUSD"], serde_json::json!(1.8));
    }

    #[test]
    fn test_order_status_reads() {
        let order: PurchaseOrder = serde_json::from_str(
            r#"{ "purchaseOrderId": 1, "supplierName": "Acme", "status": "COMPLETED" }"#,
        )
        .unwrap();
        assert_eq!(order.status, PurchaseOrderStatus::Completed);
        assert_eq!(order.order_date, None);
    }
}
