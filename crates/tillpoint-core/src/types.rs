//! # Domain Types
//!
//! Wire-level domain types shared by the catalog merge, the cart and the
//! REST services.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Inputs                                  │
//! │                                                                         │
//! │  GET /products ─────────────► CatalogProduct (base prices)             │
//! │  GET /shop-stock/shop/{id} ─► ShopStockLine { product, quantity }      │
//! │  GET /pricing-adjustments/shop/{id} ─► PriceAdjustment (dated)         │
//! │                                                                         │
//! │                         Sale Output                                     │
//! │                                                                         │
//! │  Cart ──► SaleRequest { paymentMethod, saleItems[] } ──► POST /sales   │
//! │                    ◄── SaleRecord (backend-owned totals)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! The backend speaks camelCase JSON with upper-case currency suffixes
//! (`sellingPriceUSD`), so those fields carry explicit renames.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::money::{decimal, Money, PricePair};

/// Backend product identifier.
pub type ProductId = i64;

/// Backend shop identifier.
pub type ShopId = i64;

/// Backend user identifier (the cashier on a sale).
pub type UserId = i64;

// =============================================================================
// Catalog Product
// =============================================================================

/// A product from the global catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub product_id: ProductId,

    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub unit: Option<String>,

    #[serde(default)]
    pub reorder_level: Option<i64>,

    #[serde(rename = "sellingPriceUSD", default, with = "decimal")]
    pub selling_price_usd: Money,

    #[serde(rename = "sellingPriceZWL", default, with = "decimal")]
    pub selling_price_zwl: Money,

    #[serde(default, with = "wire_date::date_option")]
    pub expiry_date: Option<NaiveDate>,
}

impl CatalogProduct {
    /// Returns both selling prices.
    pub fn prices(&self) -> PricePair {
        PricePair::new(self.selling_price_usd, self.selling_price_zwl)
    }

    /// A product is resolvable when it carries a display name.
    pub fn is_resolvable(&self) -> bool {
        !self.product_name.trim().is_empty()
    }
}

/// `{ "productId": 7 }` — how other resources point at a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_id: ProductId,
}

/// A shop as embedded in stock lines and adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRef {
    #[serde(default, alias = "shopId")]
    pub id: Option<ShopId>,

    #[serde(default)]
    pub shop_name: Option<String>,
}

// =============================================================================
// Shop Stock
// =============================================================================

/// One product's stock level in one shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopStockLine {
    #[serde(default)]
    pub product: Option<CatalogProduct>,

    #[serde(default)]
    pub quantity_in_stock: i64,

    #[serde(default)]
    pub shop: Option<ShopRef>,
}

// =============================================================================
// Price Adjustment
// =============================================================================

/// A dated override of a product's selling price.
///
/// `shop == None` means the adjustment was made globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustment {
    #[serde(default, alias = "adjustmentId")]
    pub id: Option<i64>,

    #[serde(default)]
    pub product: Option<ProductRef>,

    #[serde(default)]
    pub shop: Option<ShopRef>,

    #[serde(rename = "newPriceUSD", default, with = "decimal::option")]
    pub new_price_usd: Option<Money>,

    #[serde(rename = "newPriceZWL", default, with = "decimal::option")]
    pub new_price_zwl: Option<Money>,

    #[serde(default, with = "wire_date::timestamp_option")]
    pub adjustment_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub reason: Option<String>,
}

impl PriceAdjustment {
    pub fn product_id(&self) -> Option<ProductId> {
        self.product.map(|p| p.product_id)
    }

    pub fn shop_id(&self) -> Option<ShopId> {
        self.shop.as_ref().and_then(|s| s.id)
    }

    /// Applies this adjustment to a base price; a currency the adjustment
    /// leaves empty keeps its base price.
    pub fn apply_to(&self, base: PricePair) -> PricePair {
        PricePair::new(
            self.new_price_usd.unwrap_or(base.usd),
            self.new_price_zwl.unwrap_or(base.zwl),
        )
    }
}

// =============================================================================
// Sale
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "CASH"),
            PaymentMethod::Card => write!(f, "CARD"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}', expected cash or card", other),
            }),
        }
    }
}

/// One line of a sale submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemRequest {
    pub product: ProductRef,
    pub quantity: i64,
}

/// Body of `POST /sales/{shopId}/{cashierId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub payment_method: PaymentMethod,
    pub sale_items: Vec<SaleItemRequest>,
}

/// A sale as returned by the backend.
///
/// Totals, cost and profit are computed server-side; the client only keeps
/// the id and passes the remaining fields through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    #[serde(default)]
    pub sale_id: Option<i64>,

    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// User Draft
// =============================================================================

/// The user-management form, validated before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub full_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub roles: Vec<String>,
    pub shop_id: Option<ShopId>,
}

// =============================================================================
// Date Adapters
// =============================================================================

/// Lenient date parsing for backend timestamps.
///
/// Accepts `2025-01-02`, `2025-01-02T10:30:00[.fff]`, `2025-01-02 10:30:00`,
/// RFC 3339 (normalised to UTC), and the `[2025, 1, 2, 10, 30, 0]` array form
/// some backends emit for local date-times. Anything else reads as `None`.
pub mod wire_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    /// Parses a timestamp string in any accepted form.
    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    fn from_parts(parts: &[Value]) -> Option<NaiveDateTime> {
        let mut nums = parts.iter().map(|v| v.as_i64());
        let mut next = |default: i64| nums.next().flatten().unwrap_or(default);
        let (year, month, day) = (next(-1), next(-1), next(-1));
        let (hour, minute, second) = (next(0), next(0), next(0));
        let date = NaiveDate::from_ymd_opt(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )?;
        let time = NaiveTime::from_hms_opt(
            u32::try_from(hour).ok()?,
            u32::try_from(minute).ok()?,
            u32::try_from(second).ok()?,
        )?;
        Some(date.and_time(time))
    }

    fn from_value(value: Option<Value>) -> Option<NaiveDateTime> {
        match value? {
            Value::String(s) => parse_timestamp(&s),
            Value::Array(parts) => from_parts(&parts),
            _ => None,
        }
    }

    pub mod timestamp_option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer
                    .serialize_some(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Ok(from_value(Option::<Value>::deserialize(deserializer)?))
        }
    }

    pub mod date_option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => serializer.serialize_some(&d.format("%Y-%m-%d").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Ok(from_value(Option::<Value>::deserialize(deserializer)?).map(|dt| dt.date()))
        }
    }
}
