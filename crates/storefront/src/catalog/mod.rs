//! Client-side catalog browsing.
//!
//! The backend returns the visible product list; narrowing by brand, price
//! and volume, sorting, facets and search suggestions all happen locally on
//! that list.

mod facets;
mod history;

pub use facets::{BrandFacets, POPULAR_BRANDS, facets, volumes};
pub use history::{MAX_HISTORY, SearchHistory};

use airshop_core::ProductCategory;
use rust_decimal::Decimal;

use crate::api::Product;

/// Suggestions shown under the search box.
pub const MAX_SUGGESTIONS: usize = 5;

/// Catalog sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Backend order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    /// New arrivals first, otherwise backend order.
    New,
}

impl SortOrder {
    /// Parse from a sort parameter value. Unknown values fall back to
    /// [`SortOrder::Default`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-asc" | "price_asc" => Self::PriceAsc,
            "price-desc" | "price_desc" => Self::PriceDesc,
            "name-asc" | "name_asc" | "name" => Self::NameAsc,
            "new" => Self::New,
            _ => Self::Default,
        }
    }

    /// Convert to parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::New => "new",
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::new(20_000, 0),
        }
    }
}

/// Shopper-selected catalog filters.
///
/// Empty `brands`/`volumes` mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<ProductCategory>,
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub price: PriceRange,
    pub volumes: Vec<String>,
    pub sort: SortOrder,
}

impl CatalogFilter {
    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !product.is_visible {
            return false;
        }
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if let Some(query) = self.search_query()
            && !matches_search(product, &query)
        {
            return false;
        }
        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }
        if !self.volumes.is_empty() && !self.volumes.contains(&product.volume) {
            return false;
        }
        self.price.contains(product.price)
    }

    /// Filter and sort `products`.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut filtered: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        sort_products(&mut filtered, self.sort);
        filtered
    }

    /// Number of non-default filters, for the "filters (n)" badge.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.brands.len() + self.volumes.len() + usize::from(self.sort != SortOrder::Default)
    }

    fn search_query(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// Sort in place. Every order is stable.
pub fn sort_products(products: &mut [Product], order: SortOrder) {
    match order {
        SortOrder::Default => {}
        SortOrder::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::NameAsc => products.sort_by_cached_key(|p| p.name.to_lowercase()),
        SortOrder::New => products.sort_by_key(|p| !p.is_new),
    }
}

/// Search-box suggestions: up to [`MAX_SUGGESTIONS`] visible products whose
/// name or brand contains `query`. Queries under two characters yield nothing.
#[must_use]
pub fn suggestions<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.trim();
    if query.chars().count() < 2 {
        return Vec::new();
    }
    let query = query.to_lowercase();

    products
        .iter()
        .filter(|p| {
            p.is_visible
                && (p.name.to_lowercase().contains(&query)
                    || p.brand.to_lowercase().contains(&query))
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Case-insensitive match on name, brand or description. `query` must
/// already be lowercase.
fn matches_search(product: &Product, query: &str) -> bool {
    product.name.to_lowercase().contains(query)
        || product.brand.to_lowercase().contains(query)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query))
}
