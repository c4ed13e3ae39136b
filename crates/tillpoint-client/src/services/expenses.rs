//! Expenses (`/expenses`) and their categories (`/expense-categories`).
//!
//! An expense is either operational (tied to a shop) or a purchase cost
//! (tied to a purchase order, where it feeds the landing cost).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tillpoint_core::money::decimal;
use tillpoint_core::types::{wire_date, ShopRef};
use tillpoint_core::validation::validate_name;
use tillpoint_core::{Money, ShopId, ValidationError};
use tracing::info;

use super::purchasing::OrderRef;
use super::{Collection, IdRef};
use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    #[default]
    Operational,
    Purchase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default, alias = "expenseId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub shop: Option<ShopRef>,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(rename = "amountUSD", default, with = "decimal")]
    pub amount_usd: Money,
    #[serde(rename = "amountZWL", default, with = "decimal")]
    pub amount_zwl: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expense_type: ExpenseType,
    #[serde(default, with = "wire_date::date_option")]
    pub date: Option<NaiveDate>,
}

/// Body for `POST /expenses`. Exactly one of `shop` and `purchase_order` is
/// set, matching `expense_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<OrderRef>,
    pub category: IdRef,
    #[serde(rename = "amountUSD", with = "decimal")]
    pub amount_usd: Money,
    #[serde(rename = "amountZWL", with = "decimal")]
    pub amount_zwl: Money,
    pub description: String,
    pub expense_type: ExpenseType,
    #[serde(with = "wire_date::date_option")]
    pub date: Option<NaiveDate>,
}

impl ExpenseDraft {
    /// A running cost of a shop.
    pub fn operational(shop_id: ShopId, category_id: i64, date: NaiveDate) -> Self {
        ExpenseDraft {
            shop: Some(IdRef { id: shop_id }),
            purchase_order: None,
            category: IdRef { id: category_id },
            amount_usd: Money::zero(),
            amount_zwl: Money::zero(),
            description: String::new(),
            expense_type: ExpenseType::Operational,
            date: Some(date),
        }
    }

    /// A cost incurred bringing a purchase order in (freight, duty, ...).
    pub fn purchase(order_id: i64, category_id: i64, date: NaiveDate) -> Self {
        ExpenseDraft {
            shop: None,
            purchase_order: Some(OrderRef {
                purchase_order_id: order_id,
            }),
            category: IdRef { id: category_id },
            amount_usd: Money::zero(),
            amount_zwl: Money::zero(),
            description: String::new(),
            expense_type: ExpenseType::Purchase,
            date: Some(date),
        }
    }

    pub fn amounts(mut self, usd: Money, zwl: Money) -> Self {
        self.amount_usd = usd;
        self.amount_zwl = zwl;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The owner matches the type and at least one amount is non-zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let owner_ok = match self.expense_type {
            ExpenseType::Operational => self.shop.is_some(),
            ExpenseType::Purchase => self.purchase_order.is_some(),
        };
        if !owner_ok || (self.amount_usd.is_zero() && self.amount_zwl.is_zero()) {
            return Err(ValidationError::Rule(
                "Please fill in all required fields.".to_string(),
            ));
        }
        if self.amount_usd.cents() < 0 || self.amount_zwl.cents() < 0 {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            });
        }
        Ok(())
    }
}

pub struct ExpenseService<'a> {
    api: &'a ApiClient,
    expenses: Collection<'a, Expense>,
    categories: Collection<'a, ExpenseCategory>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        ExpenseService {
            api,
            expenses: Collection::new(api, "/expenses"),
            categories: Collection::new(api, "/expense-categories"),
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<Expense>> {
        self.expenses.list().await
    }

    pub async fn for_shop(&self, shop_id: ShopId) -> ClientResult<Vec<Expense>> {
        self.api.get(&format!("/expenses/shop/{}", shop_id)).await
    }

    pub async fn record(&self, draft: &ExpenseDraft) -> ClientResult<Expense> {
        draft.validate()?;
        let expense = self.expenses.create(draft).await?;
        info!(
            kind = ?draft.expense_type,
            usd = %draft.amount_usd,
            zwl = %draft.amount_zwl,
            "Expense recorded"
        );
        Ok(expense)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.expenses.delete(id).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn categories(&self) -> ClientResult<Vec<ExpenseCategory>> {
        self.categories.list().await
    }

    /// Creates a category. The backend answers 500 on a duplicate name.
    pub async fn create_category(&self, category: &ExpenseCategory) -> ClientResult<ExpenseCategory> {
        validate_name("category name", &category.name)?;
        self.categories.create(category).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        category: &ExpenseCategory,
    ) -> ClientResult<ExpenseCategory> {
        validate_name("category name", &category.name)?;
        self.categories.update(id, category).await
    }

    pub async fn delete_category(&self, id: i64) -> ClientResult<()> {
        self.categories.delete(id).await
    }
}
