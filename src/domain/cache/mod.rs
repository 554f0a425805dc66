//! Cache domain - Generic caching abstraction layer

mod key;
mod repository;

pub use key::{CacheNamespace, ListQuery, ALL_DESCRIPTOR, SEARCH_MARKER};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
