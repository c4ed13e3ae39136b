//! Shops (`/shops`).

use serde::{Deserialize, Serialize};
use tillpoint_core::validation::validate_name;
use tillpoint_core::ShopId;

use super::Collection;
use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[serde(default, alias = "shopId", skip_serializing_if = "Option::is_none")]
    pub id: Option<ShopId>,
    pub shop_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

pub struct ShopService<'a> {
    shops: Collection<'a, Shop>,
}

impl<'a> ShopService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        ShopService {
            shops: Collection::new(api, "/shops"),
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<Shop>> {
        self.shops.list().await
    }

    pub async fn get(&self, id: ShopId) -> ClientResult<Shop> {
        self.shops.get(id).await
    }

    /// Creates a shop. A duplicate name comes back as 400/409.
    pub async fn create(&self, shop: &Shop) -> ClientResult<Shop> {
        validate_name("shop name", &shop.shop_name)?;
        self.shops.create(shop).await
    }

    pub async fn update(&self, id: ShopId, shop: &Shop) -> ClientResult<Shop> {
        validate_name("shop name", &shop.shop_name)?;
        self.shops.update(id, shop).await
    }

    pub async fn delete(&self, id: ShopId) -> ClientResult<()> {
        self.shops.delete(id).await
    }
}
