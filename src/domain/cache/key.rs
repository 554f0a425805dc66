//! Cache key derivation for product listings

use crate::domain::product::Category;

/// Descriptor used for the unscoped listing
pub const ALL_DESCRIPTOR: &str = "all";

/// Marker placed before a literal search term
pub const SEARCH_MARKER: &str = "search:";

/// The logical query a cached listing answers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListQuery {
    /// Every product of the category
    All,
    /// Products whose name contains the term
    Search(String),
}

impl ListQuery {
    /// Builds a query from an optional search term. Blank terms list everything.
    pub fn from_search(search: Option<&str>) -> Self {
        match search {
            Some(term) if !term.trim().is_empty() => ListQuery::Search(term.to_string()),
            _ => ListQuery::All,
        }
    }

    /// Descriptor appended to the namespace prefix
    ///
    /// Search terms carry a marker so a search for the literal word "all"
    /// does not share a key with the unscoped listing.
    pub fn descriptor(&self) -> String {
        match self {
            ListQuery::All => ALL_DESCRIPTOR.to_string(),
            ListQuery::Search(term) => format!("{}{}", SEARCH_MARKER, term),
        }
    }
}

/// Key namespace owned by one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNamespace {
    prefix: String,
}

impl CacheNamespace {
    /// Creates a namespace with an explicit prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Namespace for a product category, e.g. `fruits:`
    pub fn for_category(category: Category) -> Self {
        Self::new(format!("{}:", category.plural()))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full key for a query in this namespace
    pub fn key(&self, query: &ListQuery) -> String {
        format!("{}{}", self.prefix, query.descriptor())
    }
}
