//! Product validation utilities

use std::fmt;

use super::entity::NewProduct;

/// Maximum length for product names
pub const MAX_NAME_LENGTH: usize = 255;

/// Product validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    /// Name is empty or whitespace
    BlankName,
    /// Name exceeds maximum length
    NameTooLong { length: usize, max: usize },
    /// Quantity is zero, negative or not a finite number
    NonPositiveQuantity { value: f64 },
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankName => write!(f, "Name cannot be blank"),
            Self::NameTooLong { length, max } => {
                write!(
                    f,
                    "Name cannot exceed {} characters (got {})",
                    max, length
                )
            }
            Self::NonPositiveQuantity { value } => {
                write!(f, "Quantity must be positive (got {})", value)
            }
        }
    }
}

impl std::error::Error for ProductValidationError {}

/// Validate a product name
pub fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::BlankName);
    }

    let length = name.chars().count();

    if length > MAX_NAME_LENGTH {
        return Err(ProductValidationError::NameTooLong {
            length,
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validate a quantity, in any unit
pub fn validate_quantity(quantity: f64) -> Result<(), ProductValidationError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ProductValidationError::NonPositiveQuantity { value: quantity });
    }

    Ok(())
}

/// Validate a product before it is persisted
pub fn validate_new_product(product: &NewProduct) -> Result<(), ProductValidationError> {
    validate_name(&product.name)?;
    validate_quantity(product.quantity_grams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{Category, Unit};

    #[test]
    fn test_valid_name() {
        assert!(validate_name("Apple").is_ok());
        assert!(validate_name("A").is_ok());
    }

    #[test]
    fn test_blank_name() {
        assert_eq!(validate_name(""), Err(ProductValidationError::BlankName));
        assert_eq!(validate_name("   "), Err(ProductValidationError::BlankName));
    }

    #[test]
    fn test_name_too_long() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);

        assert!(matches!(
            validate_name(&name),
            Err(ProductValidationError::NameTooLong { length: 256, .. })
        ));
        assert!(validate_name(&"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(0.5).is_ok());
        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let ok = NewProduct::new(Category::Fruit, "Apple", 1.5, Unit::Kilograms);
        assert!(validate_new_product(&ok).is_ok());

        let bad = NewProduct::new(Category::Fruit, "Apple", 0.0, Unit::Grams);
        assert_eq!(
            validate_new_product(&bad).unwrap_err().to_string(),
            "Quantity must be positive (got 0)"
        );
    }
}
