//! Order endpoints.

use airshop_core::{OrderId, OrderStatus};
use tracing::{info, instrument};

use super::types::{
    Acknowledgement, Order, OrderEnvelope, OrderList, OrderLookup, OrderQuery, OrderRequest,
    OrderStats, StatusUpdate,
};
use super::{ApiClient, ApiError};

/// `/orders` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(super) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Submit an order. Public; the backend prices the items and sets the
    /// initial status from the payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or a product is unknown.
    #[instrument(skip(self, request), fields(order_number = %request.order_number))]
    pub async fn create(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        let response: OrderEnvelope<Order> = self.client.post("/orders", request).await?;
        info!(order_id = %response.order.id, "Order created");
        Ok(response.order)
    }

    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &OrderQuery) -> Result<OrderList, ApiError> {
        self.client.get_with_query("/orders", query).await
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Order, ApiError> {
        let response: OrderEnvelope<Order> = self.client.get(&format!("/orders/{id}")).await?;
        Ok(response.order)
    }

    /// Public order status lookup by order number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no order has this number.
    #[instrument(skip(self))]
    pub async fn get_by_number(&self, order_number: &str) -> Result<OrderLookup, ApiError> {
        let path = format!("/orders/by-number/{}", order_number.trim());
        let response: OrderEnvelope<OrderLookup> = self.client.get(&path).await?;
        Ok(response.order)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        let response: OrderEnvelope<Order> = self
            .client
            .put(&format!("/orders/{id}/status"), &StatusUpdate { status })
            .await?;
        Ok(response.order)
    }

    /// Delete an order and its items.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete(&self, id: OrderId) -> Result<Acknowledgement, ApiError> {
        self.client.delete(&format!("/orders/{id}")).await
    }

    /// Order counts by status and total revenue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<OrderStats, ApiError> {
        self.client.get("/orders/stats").await
    }
}
