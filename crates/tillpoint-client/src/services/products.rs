//! Products (`/products`) and price adjustments (`/pricing-adjustments`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tillpoint_core::money::decimal;
use tillpoint_core::types::wire_date;
use tillpoint_core::validation::validate_name;
use tillpoint_core::{
    CatalogProduct, Money, PriceAdjustment, ProductId, ShopId, UserId, ValidationError,
};
use tracing::info;

use super::Collection;
use crate::api::ApiClient;
use crate::error::ClientResult;

/// Body for creating or editing a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub product_name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub reorder_level: Option<i64>,
    #[serde(rename = "sellingPriceUSD", with = "decimal")]
    pub selling_price_usd: Money,
    #[serde(rename = "sellingPriceZWL", with = "decimal")]
    pub selling_price_zwl: Money,
    #[serde(default, with = "wire_date::date_option")]
    pub expiry_date: Option<NaiveDate>,
}

/// Body for a global or per-shop price change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    #[serde(rename = "newSellingUSD", default, with = "decimal::option")]
    pub new_selling_usd: Option<Money>,
    #[serde(rename = "newSellingZWL", default, with = "decimal::option")]
    pub new_selling_zwl: Option<Money>,
    pub reason: Option<String>,
    pub user_id: Option<UserId>,
}

impl PriceUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let prices = [self.new_selling_usd, self.new_selling_zwl];
        if prices.iter().all(Option::is_none) {
            return Err(ValidationError::Rule(
                "Enter at least one new selling price.".to_string(),
            ));
        }
        if prices.iter().flatten().any(|p| !p.is_positive()) {
            return Err(ValidationError::MustBePositive {
                field: "selling price".to_string(),
            });
        }
        Ok(())
    }
}

pub struct ProductService<'a> {
    api: &'a ApiClient,
    products: Collection<'a, CatalogProduct>,
}

impl<'a> ProductService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        ProductService {
            api,
            products: Collection::new(api, "/products"),
        }
    }

    /// The global catalog.
    pub async fn list(&self) -> ClientResult<Vec<CatalogProduct>> {
        self.products.list().await
    }

    pub async fn get(&self, id: ProductId) -> ClientResult<CatalogProduct> {
        self.products.get(id).await
    }

    pub async fn by_shop(&self, shop_id: ShopId) -> ClientResult<Vec<CatalogProduct>> {
        self.api.get(&format!("/products/shop/{}", shop_id)).await
    }

    /// Products at or below their reorder level in a shop.
    pub async fn below_reorder(&self, shop_id: ShopId) -> ClientResult<Vec<CatalogProduct>> {
        self.api.get(&format!("/products/reorder/{}", shop_id)).await
    }

    pub async fn create(&self, draft: &ProductDraft) -> ClientResult<CatalogProduct> {
        validate_name("product name", &draft.product_name)?;
        self.products.create(draft).await
    }

    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> ClientResult<CatalogProduct> {
        validate_name("product name", &draft.product_name)?;
        self.products.update(id, draft).await
    }

    pub async fn delete(&self, id: ProductId) -> ClientResult<()> {
        self.products.delete(id).await
    }

    // =========================================================================
    // Price Adjustments
    // =========================================================================

    /// Changes the catalog price everywhere.
    pub async fn update_global_price(
        &self,
        product_id: ProductId,
        update: &PriceUpdate,
    ) -> ClientResult<serde_json::Value> {
        update.validate()?;
        let result = self
            .api
            .put(
                &format!("/pricing-adjustments/global/{}/update-price", product_id),
                update,
            )
            .await?;
        info!(product_id, "Global price updated");
        Ok(result)
    }

    /// Records a shop-specific price; the cashier terminal picks it up on its
    /// next load.
    pub async fn update_shop_price(
        &self,
        shop_id: ShopId,
        product_id: ProductId,
        update: &PriceUpdate,
    ) -> ClientResult<serde_json::Value> {
        update.validate()?;
        let result = self
            .api
            .put(
                &format!(
                    "/pricing-adjustments/shop/{}/product/{}/update-price",
                    shop_id, product_id
                ),
                update,
            )
            .await?;
        info!(shop_id, product_id, "Shop price updated");
        Ok(result)
    }

    pub async fn adjustments_for_product(
        &self,
        product_id: ProductId,
    ) -> ClientResult<Vec<PriceAdjustment>> {
        self.api
            .get(&format!("/pricing-adjustments/product/{}", product_id))
            .await
    }

    pub async fn adjustments_for_shop(&self, shop_id: ShopId) -> ClientResult<Vec<PriceAdjustment>> {
        self.api
            .get(&format!("/pricing-adjustments/shop/{}", shop_id))
            .await
    }
}
