//! Shop stock, stock logs and stock transfers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /shop-stock/shop/{id}     quantities per shop (cashier terminal)       │
//! │  /shop-stock/adjust        PATCH delta, costed at the shop's price      │
//! │  /stocks/...               movement log                                 │
//! │  /stock-transfers/...      pending transfer ──approve──► moved          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tillpoint_core::types::ShopRef;
use tillpoint_core::validation::{validate_quantity, validate_transfer};
use tillpoint_core::{Money, ProductId, ProductRef, ShopId, ShopStockLine, ValidationError};
use tracing::{debug, info};

use super::Collection;
use crate::api::ApiClient;
use crate::error::ClientResult;

/// A stock movement as logged by the backend; shown as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// A manual stock correction for one product in one shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub shop_id: ShopId,
    pub product_id: ProductId,
    /// Positive adds stock, negative removes it.
    pub delta_qty: i64,
}

/// A logged movement (`POST /stocks/record`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub qty: i64,
    /// IN, OUT, ADJUSTMENT or TRANSFER.
    pub transaction_type: String,
    pub reason: Option<String>,
    pub reference_id: Option<i64>,
    pub unit_cost_usd: Money,
    pub unit_cost_zwl: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTransfer {
    #[serde(default, alias = "transferId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub from_shop: Option<ShopRef>,
    #[serde(default)]
    pub to_shop: Option<ShopRef>,
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub status: Option<String>,
}

impl StockTransfer {
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("PENDING"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub from_shop_id: ShopId,
    pub to_shop_id: ShopId,
    pub product_id: ProductId,
    pub quantity: i64,
}

pub struct StockService<'a> {
    api: &'a ApiClient,
    transfers: Collection<'a, StockTransfer>,
}

impl<'a> StockService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        StockService {
            api,
            transfers: Collection::new(api, "/stock-transfers"),
        }
    }

    // =========================================================================
    // Shop Stock
    // =========================================================================

    pub async fn shop_stock(&self, shop_id: ShopId) -> ClientResult<Vec<ShopStockLine>> {
        self.api.get(&format!("/shop-stock/shop/{}", shop_id)).await
    }

    /// Applies a stock delta, costed at the product's current price in that
    /// shop (zero when the shop does not stock it yet).
    pub async fn adjust(&self, adjustment: StockAdjustment) -> ClientResult<serde_json::Value> {
        if adjustment.delta_qty == 0 {
            return Err(ValidationError::Rule("Quantity change cannot be zero.".to_string()).into());
        }

        let stock = self.shop_stock(adjustment.shop_id).await?;
        let prices = stock
            .iter()
            .filter_map(|line| line.product.as_ref())
            .find(|p| p.product_id == adjustment.product_id)
            .map(|p| p.prices())
            .unwrap_or_default();

        let query = [
            ("shopId", adjustment.shop_id.to_string()),
            ("productId", adjustment.product_id.to_string()),
            ("deltaQty", adjustment.delta_qty.to_string()),
            ("costUSD", prices.usd.to_string()),
            ("costZWL", prices.zwl.to_string()),
        ];
        debug!(?adjustment, "Adjusting stock");
        let result = self.api.patch_query("/shop-stock/adjust", &query).await?;
        info!(
            shop_id = adjustment.shop_id,
            product_id = adjustment.product_id,
            delta = adjustment.delta_qty,
            "Stock adjusted"
        );
        Ok(result)
    }

    // =========================================================================
    // Stock Logs
    // =========================================================================

    pub async fn logs_for_shop(&self, shop_id: ShopId) -> ClientResult<Vec<StockLog>> {
        self.api.get(&format!("/stocks/shop/{}", shop_id)).await
    }

    pub async fn logs_for_product(&self, product_id: ProductId) -> ClientResult<Vec<StockLog>> {
        self.api.get(&format!("/stocks/product/{}", product_id)).await
    }

    pub async fn record_movement(&self, movement: &StockMovement) -> ClientResult<serde_json::Value> {
        validate_quantity("quantity", movement.qty)?;
        let mut query = vec![
            ("productId", movement.product_id.to_string()),
            ("shopId", movement.shop_id.to_string()),
            ("qty", movement.qty.to_string()),
            ("type", movement.transaction_type.clone()),
            ("unitCostUSD", movement.unit_cost_usd.to_string()),
            ("unitCostZWL", movement.unit_cost_zwl.to_string()),
        ];
        if let Some(reason) = &movement.reason {
            query.push(("reason", reason.clone()));
        }
        if let Some(reference) = movement.reference_id {
            query.push(("referenceId", reference.to_string()));
        }
        self.api.post_query("/stocks/record", &query).await
    }

    /// Removes a log entry, for corrections.
    pub async fn delete_log(&self, id: i64) -> ClientResult<()> {
        self.api.delete(&format!("/stocks/{}", id)).await
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    pub async fn transfers(&self) -> ClientResult<Vec<StockTransfer>> {
        self.transfers.list().await
    }

    pub async fn transfers_for_shop(&self, shop_id: ShopId) -> ClientResult<Vec<StockTransfer>> {
        self.api.get(&format!("/stock-transfers/shop/{}", shop_id)).await
    }

    /// Creates a pending transfer. The backend rejects it when the source shop
    /// is short; that rejection reads "insufficient" in its message.
    pub async fn create_transfer(&self, request: TransferRequest) -> ClientResult<StockTransfer> {
        validate_transfer(request.from_shop_id, request.to_shop_id, request.quantity)?;
        let query = [
            ("fromShopId", request.from_shop_id.to_string()),
            ("toShopId", request.to_shop_id.to_string()),
            ("productId", request.product_id.to_string()),
            ("quantity", request.quantity.to_string()),
        ];
        let transfer = self.api.post_query("/stock-transfers", &query).await?;
        info!(?request, "Stock transfer created");
        Ok(transfer)
    }

    pub async fn approve_transfer(&self, id: i64) -> ClientResult<StockTransfer> {
        let transfer = self
            .api
            .put_empty(&format!("/stock-transfers/{}/approve", id))
            .await?;
        info!(transfer_id = id, "Stock transfer approved");
        Ok(transfer)
    }

    pub async fn delete_transfer(&self, id: i64) -> ClientResult<()> {
        self.transfers.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_wire_shape() {
        let json = r#"{
            "transferId": 3,
            "fromShop": { "id": 1, "shopName": "Main" },
            "toShop": { "id": 2, "shopName": "Branch" },
            "product": { "productId": 10, "productName": "Sugar 2kg" },
            "quantity": 5,
            "status": "PENDING"
        }"#;
        let transfer: StockTransfer = serde_json::from_str(json).unwrap();
        assert_eq!(transfer.id, Some(3));
        assert_eq!(transfer.product, Some(ProductRef { product_id: 10 }));
        assert!(transfer.is_pending());
    }
}
