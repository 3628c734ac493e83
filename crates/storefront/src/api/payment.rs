//! Payment gateway endpoints, proxied by the backend.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::types::{PaymentCreated, PaymentRequest, PaymentState, Refund, RefundRequest};
use super::{ApiClient, ApiError};

/// `/payment` endpoints.
///
/// The backend reports gateway failures as `{"success": false, "error": ...}`,
/// usually with a 400 status ([`ApiError::Api`]). A `success: false` body on
/// a 2xx response surfaces as [`ApiError::Declined`].
#[derive(Debug, Clone, Copy)]
pub struct PaymentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentApi<'a> {
    pub(super) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create a payment for an existing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway declines it.
    #[instrument(
        skip(self, request),
        fields(order_number = %request.order_number, amount = %request.amount)
    )]
    pub async fn create(&self, request: &PaymentRequest) -> Result<PaymentCreated, ApiError> {
        let created: PaymentCreated = self.client.post("/payment/create", request).await?;
        if !created.success {
            let message = created
                .error
                .unwrap_or_else(|| "payment was not created".to_string());
            info!(message = %message, "Gateway declined payment");
            return Err(ApiError::Declined(message));
        }
        Ok(created)
    }

    /// Current gateway status of a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn status(&self, payment_id: &str) -> Result<PaymentState, ApiError> {
        self.client
            .get(&format!("/payment/status/{}", payment_id.trim()))
            .await
    }

    /// Refund a payment in full, or `amount` of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway refuses.
    #[instrument(skip(self))]
    pub async fn refund(
        &self,
        payment_id: &str,
        amount: Option<Decimal>,
    ) -> Result<Refund, ApiError> {
        let refund: Refund = self
            .client
            .post(
                "/payment/refund",
                &RefundRequest {
                    payment_id: payment_id.trim(),
                    amount,
                },
            )
            .await?;
        if !refund.success {
            return Err(ApiError::Declined(
                refund
                    .error
                    .unwrap_or_else(|| "refund was not created".to_string()),
            ));
        }
        Ok(refund)
    }
}
