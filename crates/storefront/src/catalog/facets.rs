//! Brand and volume facets for the catalog sidebar.

use std::collections::BTreeSet;

use crate::api::Product;

/// Brands pinned to the top of the brand list, in display order.
pub const POPULAR_BRANDS: &[&str] = &["VERSACE", "DIOR", "CHANEL", "TOM FORD", "BYREDO"];

/// Brands present in a product list, split for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandFacets {
    /// Present popular brands, in [`POPULAR_BRANDS`] order.
    pub popular: Vec<String>,
    /// Every other brand, sorted.
    pub others: Vec<String>,
}

impl BrandFacets {
    /// Popular brands followed by the rest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.popular.iter().chain(&self.others).map(String::as_str)
    }
}

/// Brand facets for `products`.
#[must_use]
pub fn facets(products: &[Product]) -> BrandFacets {
    let present: BTreeSet<&str> = products.iter().map(|p| p.brand.as_str()).collect();

    let popular = POPULAR_BRANDS
        .iter()
        .filter(|brand| present.contains(*brand))
        .map(|brand| (*brand).to_string())
        .collect();

    let others = present
        .into_iter()
        .filter(|brand| !POPULAR_BRANDS.contains(brand))
        .map(str::to_string)
        .collect();

    BrandFacets { popular, others }
}

/// Distinct volumes in `products`, sorted.
#[must_use]
pub fn volumes(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.volume.as_str())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
