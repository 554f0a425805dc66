//! Product domain - fruits and vegetables measured in grams

mod entity;
mod repository;
mod unit;
mod validation;

pub use entity::{Category, NewProduct, Product, ProductId, ProductView};
pub use repository::ProductRepository;
pub use unit::{from_grams, to_grams, to_kilograms, Unit, GRAMS_PER_KILOGRAM};
pub use validation::{
    validate_name, validate_new_product, validate_quantity, ProductValidationError,
    MAX_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::MockProductRepository;
