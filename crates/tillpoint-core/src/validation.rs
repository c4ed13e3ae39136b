//! # Validation
//!
//! Checks run before a request leaves the client. The backend re-validates
//! everything; these exist so the user gets an answer without a round trip.
//!
//! ## Usage
//! ```rust
//! use tillpoint_core::validation::{parse_item_spec, validate_quantity};
//!
//! assert_eq!(parse_item_spec("42:3").unwrap(), (42, 3));
//! assert!(validate_quantity("quantity", 0).is_err());
//! ```

use crate::access::Role;
use crate::error::ValidationError;
use crate::types::{ProductId, ShopId, UserDraft};

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of shop, category and product names.
pub const MAX_NAME_LENGTH: usize = 100;

// =============================================================================
// Scalars
// =============================================================================

pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Non-blank, at most [`MAX_NAME_LENGTH`] characters. Returns the trimmed name.
pub fn validate_name<'a>(field: &str, name: &'a str) -> ValidationResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(name)
}

// =============================================================================
// Forms
// =============================================================================

/// User-management form rules.
///
/// ## Rules
/// - Full name and username are required
/// - A password is required when creating a user
/// - At least one role
/// - Cashiers and supervisors must be assigned to a shop
pub fn validate_user_draft(draft: &UserDraft, is_new: bool) -> ValidationResult<()> {
    if draft.full_name.trim().is_empty() || draft.username.trim().is_empty() {
        return Err(ValidationError::Rule(
            "Full name and username are required.".to_string(),
        ));
    }

    let has_password = draft.password.as_deref().is_some_and(|p| !p.is_empty());
    if is_new && !has_password {
        return Err(ValidationError::Rule(
            "Password is required for new users.".to_string(),
        ));
    }

    if draft.roles.is_empty() {
        return Err(ValidationError::Rule("Select at least one role.".to_string()));
    }

    let needs_shop = draft
        .roles
        .iter()
        .map(|tag| Role::from(tag.as_str()))
        .any(|role| matches!(role, Role::Cashier | Role::Supervisor));
    if needs_shop && draft.shop_id.is_none() {
        return Err(ValidationError::Rule(
            "Cashier/Supervisor must be assigned to a shop.".to_string(),
        ));
    }

    Ok(())
}

/// A transfer needs two different shops and a positive quantity.
pub fn validate_transfer(from: ShopId, to: ShopId, quantity: i64) -> ValidationResult<()> {
    if from == to {
        return Err(ValidationError::Rule(
            "Source and destination shops must be different.".to_string(),
        ));
    }
    validate_quantity("quantity", quantity)
}

// =============================================================================
// Command-line Input
// =============================================================================

/// Parses `productId[:quantity]`; the quantity defaults to 1.
pub fn parse_item_spec(spec: &str) -> ValidationResult<(ProductId, i64)> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "item".to_string(),
        reason: format!("'{}': {}", spec, reason),
    };

    let (id_part, qty_part) = match spec.trim().split_once(':') {
        Some((id, qty)) => (id, Some(qty)),
        None => (spec.trim(), None),
    };

    let product_id: ProductId = id_part
        .trim()
        .parse()
        .map_err(|_| invalid("product id must be a number"))?;

    let quantity = match qty_part {
        Some(q) => q
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("quantity must be a number"))?,
        None => 1,
    };
    validate_quantity("quantity", quantity)?;

    Ok((product_id, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(roles: &[&str], shop_id: Option<ShopId>) -> UserDraft {
        UserDraft {
            full_name: "Jane Doe".into(),
            username: "jdoe".into(),
            password: Some("secret".into()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            shop_id,
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("shop name", "  Main  ").unwrap(), "Main");
        assert!(validate_name("shop name", "   ").is_err());
        assert!(validate_name("shop name", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_user_draft_rules() {
        assert!(validate_user_draft(&draft(&["ROLE_ADMIN"], None), true).is_ok());

        let mut missing_name = draft(&["ROLE_ADMIN"], None);
        missing_name.full_name = " ".into();
        assert_eq!(
            validate_user_draft(&missing_name, true).unwrap_err().to_string(),
            "Full name and username are required."
        );

        let mut no_password = draft(&["ROLE_ADMIN"], None);
        no_password.password = None;
        assert!(validate_user_draft(&no_password, true).is_err());
        assert!(validate_user_draft(&no_password, false).is_ok());

        assert_eq!(
            validate_user_draft(&draft(&[], None), true).unwrap_err().to_string(),
            "Select at least one role."
        );
        assert!(validate_user_draft(&draft(&["ROLE_CASHIER"], None), true).is_err());
        assert!(validate_user_draft(&draft(&["ROLE_SUPERVISOR"], Some(2)), true).is_ok());
    }

    #[test]
    fn test_validate_transfer() {
        assert!(validate_transfer(1, 1, 5).is_err());
        assert!(validate_transfer(1, 2, 0).is_err());
        assert!(validate_transfer(1, 2, 5).is_ok());
    }

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(parse_item_spec("12").unwrap(), (12, 1));
        assert_eq!(parse_item_spec(" 12 : 4 ").unwrap(), (12, 4));
        assert!(parse_item_spec("abc").is_err());
        assert!(parse_item_spec("12:0").is_err());
        assert!(parse_item_spec("12:x").is_err());
    }
}
