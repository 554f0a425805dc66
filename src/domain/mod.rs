//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod import;
pub mod product;

pub use cache::{Cache, CacheExt, CacheNamespace, ListQuery};
pub use error::DomainError;
pub use import::{parse_product_list, split_by_category, ImportRecord, SplitProducts};
pub use product::{
    from_grams, to_grams, to_kilograms, validate_name, validate_new_product, validate_quantity,
    Category, NewProduct, Product, ProductId, ProductRepository, ProductValidationError,
    ProductView, Unit, GRAMS_PER_KILOGRAM, MAX_NAME_LENGTH,
};
