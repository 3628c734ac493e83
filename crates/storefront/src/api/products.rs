//! Product endpoints.
//!
//! Reads are cached for 5 minutes. Every admin write drops the whole cache,
//! since a single change can move a product in or out of any cached list.

use airshop_core::ProductId;
use tracing::{debug, instrument};

use super::types::{
    Acknowledgement, BulkCreateRequest, BulkCreated, CsvImportReport, CsvImportRequest,
    NewProduct, Product, ProductEnvelope, ProductQuery, ProductUpdate, ProductsEnvelope,
};
use super::{ApiClient, ApiError};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// `/products` and `/admin/import-csv` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(super) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List products matching `query`.
    ///
    /// Search queries bypass the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("products:{query:?}");
        let cacheable = query.search.is_none();

        // Check cache (only for queries without search)
        if cacheable
            && let Some(CacheValue::Products(products)) = self.client.cache().get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let response: ProductsEnvelope = self.client.get_with_query("/products", query).await?;

        if cacheable {
            self.client
                .cache()
                .insert(cache_key, CacheValue::Products(response.products.clone()))
                .await;
        }

        Ok(response.products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.client.cache().get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let response: ProductEnvelope = self.client.get(&format!("/products/{id}")).await?;

        self.client
            .cache()
            .insert(
                cache_key,
                CacheValue::Product(Box::new(response.product.clone())),
            )
            .await;

        Ok(response.product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let response: ProductEnvelope = self.client.post("/products", product).await?;
        self.invalidate();
        Ok(response.product)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Product, ApiError> {
        let response: ProductEnvelope = self
            .client
            .put(&format!("/products/{id}"), update)
            .await?;
        self.invalidate();
        Ok(response.product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<Acknowledgement, ApiError> {
        let ack = self.client.delete(&format!("/products/{id}")).await?;
        self.invalidate();
        Ok(ack)
    }

    /// Create many products in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the backend creates all or
    /// none.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn bulk_create(&self, products: &[NewProduct]) -> Result<BulkCreated, ApiError> {
        let created = self
            .client
            .post("/products/bulk", &BulkCreateRequest { products })
            .await?;
        self.invalidate();
        Ok(created)
    }

    /// Upload a supplier CSV for the backend to import.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. Rows the backend rejects
    /// are reported in [`CsvImportReport::errors`], not as an error.
    #[instrument(skip(self, csv_data), fields(bytes = csv_data.len()))]
    pub async fn import_csv(&self, csv_data: &str) -> Result<CsvImportReport, ApiError> {
        let report = self
            .client
            .post("/admin/import-csv", &CsvImportRequest { csv_data })
            .await?;
        self.invalidate();
        Ok(report)
    }

    /// Drop every cached product response.
    pub fn invalidate(&self) {
        self.client.cache().invalidate_all();
    }
}
