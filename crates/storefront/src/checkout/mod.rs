//! Turning the cart into an order.
//!
//! [`Checkout::place_order`] validates the form, submits the order, starts
//! payment for online methods and clears the cart once the order is in.
//!
//! | Method        | Payment mode | Outcome                               |
//! |---------------|--------------|---------------------------------------|
//! | cash          | any          | [`CheckoutOutcome::Completed`]        |
//! | card, SBP     | test         | [`CheckoutOutcome::MockConfirmed`]    |
//! | card, SBP     | production   | [`CheckoutOutcome::RedirectRequired`] |
//!
//! A failed request leaves the cart as it was, so the shopper can retry.

mod form;
mod summary;

pub use form::{CheckoutForm, FieldError, FormErrors};
pub use summary::{OrderSummary, generate_order_number, receipt_items};

use std::sync::Arc;

use airshop_core::{PaymentMethod, PaymentStatus};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::{
    ApiClient, ApiError, Order, OrderItemRequest, OrderRequest, PaymentCreated, PaymentRequest,
    ShippingSettings,
};
use crate::cart::{CartLineItem, CartStore};
use crate::config::{CheckoutConfig, PaymentMode};
use crate::error::add_breadcrumb;

/// Errors that abort checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid checkout form: {0}")]
    InvalidForm(FormErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The gateway accepted the payment but gave nowhere to send the shopper.
    #[error("Payment {0} has no confirmation URL")]
    MissingConfirmation(String),
}

/// How a placed order continues.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Cash on delivery; nothing left to do.
    Completed { order: Order },
    /// Test payment mode; the payment was confirmed locally.
    MockConfirmed {
        order: Order,
        payment: PaymentCreated,
    },
    /// Send the shopper to the gateway to pay.
    RedirectRequired {
        order: Order,
        payment_id: String,
        confirmation_url: String,
    },
}

impl CheckoutOutcome {
    /// The order that was created.
    #[must_use]
    pub const fn order(&self) -> &Order {
        match self {
            Self::Completed { order }
            | Self::MockConfirmed { order, .. }
            | Self::RedirectRequired { order, .. } => order,
        }
    }
}

/// Checkout flow over a cart and the backend.
#[derive(Clone)]
pub struct Checkout {
    api: ApiClient,
    cart: Arc<dyn CartStore>,
    config: CheckoutConfig,
}

impl Checkout {
    #[must_use]
    pub fn new(api: ApiClient, cart: Arc<dyn CartStore>, config: CheckoutConfig) -> Self {
        Self { api, cart, config }
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn summary(&self, shipping: &ShippingSettings) -> OrderSummary {
        OrderSummary::compute(&self.cart.read(), shipping)
    }

    /// Place an order for the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] or [`CheckoutError::InvalidForm`]
    /// before contacting the backend, or the API error that stopped the
    /// order or payment. The cart is only cleared on success.
    #[instrument(skip(self, form), fields(payment_method = %payment_method))]
    pub async fn place_order(
        &self,
        form: &CheckoutForm,
        payment_method: PaymentMethod,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let items = self.cart.read();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate().map_err(CheckoutError::InvalidForm)?;

        let request = build_order_request(form, &items, payment_method);
        let order = self.api.orders().create(&request).await?;
        info!(order_number = %order.order_number, total = %order.total_amount, "Order placed");
        add_breadcrumb(
            "checkout",
            "Order placed",
            &[("order_number", order.order_number.as_str())],
        );

        let outcome = match (payment_method.gateway_code(), self.config.payment_mode) {
            (None, _) => CheckoutOutcome::Completed { order },
            (Some(_), PaymentMode::Test) => {
                let payment = mock_payment();
                info!(payment_id = ?payment.payment_id, "Test payment confirmed locally");
                CheckoutOutcome::MockConfirmed { order, payment }
            }
            (Some(gateway_code), PaymentMode::Production) => {
                let request = PaymentRequest {
                    order_number: order.order_number.clone(),
                    amount: order.total_amount,
                    currency: self.config.currency.code().to_string(),
                    payment_method: gateway_code.to_string(),
                    return_url: self.config.return_url.clone(),
                    receipt: receipt_items(&items, self.config.currency),
                };
                let payment = self.api.payment().create(&request).await?;
                let payment_id = payment.payment_id.unwrap_or_default();
                let confirmation_url = payment
                    .confirmation_url
                    .ok_or_else(|| CheckoutError::MissingConfirmation(payment_id.clone()))?;
                CheckoutOutcome::RedirectRequired {
                    order,
                    payment_id,
                    confirmation_url,
                }
            }
        };

        self.cart.clear();
        Ok(outcome)
    }
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout")
            .field("api", &self.api)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Order submission for the cart contents.
#[must_use]
pub fn build_order_request(
    form: &CheckoutForm,
    items: &[CartLineItem],
    payment_method: PaymentMethod,
) -> OrderRequest {
    OrderRequest {
        order_number: generate_order_number(),
        customer: form.customer(),
        delivery: form.delivery(),
        comment: form.comment(),
        items: items
            .iter()
            .map(|item| OrderItemRequest {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
        payment_method,
        payment_id: None,
    }
}

fn mock_payment() -> PaymentCreated {
    PaymentCreated {
        success: true,
        payment_id: Some(format!("test-{}", Uuid::new_v4())),
        confirmation_url: None,
        status: Some(PaymentStatus::Pending),
        error: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use airshop_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{Cart, CartProduct};
    use crate::config::ApiConfig;
    use crate::session::CredentialSession;
    use crate::storage::MemoryStore;

    fn checkout_with_cart() -> (Cart, Checkout) {
        let store = Arc::new(MemoryStore::new());
        let cart = Cart::new(store.clone());
        // Nothing listens here; requests that reach the network would fail.
        let api = ApiClient::new(
            &ApiConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout: Duration::from_secs(1),
            },
            CredentialSession::new(store),
        )
        .unwrap();
        let checkout = Checkout::new(api, Arc::new(cart.clone()), CheckoutConfig::default());
        (cart, checkout)
    }

    fn perfume() -> CartProduct {
        CartProduct {
            product_id: ProductId::new(1),
            name: "Sauvage".to_string(),
            brand: "DIOR".to_string(),
            image: String::new(),
            price: Decimal::new(1000, 0),
            volume: "100мл".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (_, checkout) = checkout_with_cart();
        let result = checkout
            .place_order(&form::tests::valid_form(), PaymentMethod::Cash)
            .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_invalid_form_rejected_before_network() {
        let (cart, checkout) = checkout_with_cart();
        cart.add(perfume(), 1);

        let form = CheckoutForm {
            email: String::new(),
            ..form::tests::valid_form()
        };
        let result = checkout.place_order(&form, PaymentMethod::Card).await;
        assert!(matches!(result, Err(CheckoutError::InvalidForm(e)) if e.has("email")));
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_keeps_cart() {
        let (cart, checkout) = checkout_with_cart();
        cart.add(perfume(), 2);

        let result = checkout
            .place_order(&form::tests::valid_form(), PaymentMethod::Cash)
            .await;
        assert!(matches!(result, Err(CheckoutError::Api(ApiError::Http(_)))));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_build_order_request() {
        let items = vec![CartLineItem {
            product_id: ProductId::new(7),
            name: "No 5".to_string(),
            brand: "CHANEL".to_string(),
            image: String::new(),
            price: Decimal::new(15_000, 0),
            volume: "50мл".to_string(),
            quantity: 2,
        }];
        let request = build_order_request(&form::tests::valid_form(), &items, PaymentMethod::Sbp);

        assert!(request.order_number.starts_with("AirShop-"));
        assert_eq!(request.customer.name, "Анна Иванова");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].product_id, ProductId::new(7));
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.payment_method, PaymentMethod::Sbp);
        assert!(request.payment_id.is_none());
    }

    #[test]
    fn test_mock_payment_shape() {
        let payment = mock_payment();
        assert!(payment.success);
        assert!(payment.payment_id.unwrap().starts_with("test-"));
        assert_eq!(payment.status, Some(PaymentStatus::Pending));
    }
}
