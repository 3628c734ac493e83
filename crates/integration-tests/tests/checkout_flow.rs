//! Checkout against the fake backend for each payment path.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use airshop_core::{OrderStatus, PaymentMethod, PaymentStatus, ProductId};
use airshop_integration_tests::{CONFIRMATION_URL, FakeBackend, PaymentBehavior};
use airshop_storefront::api::{ApiClient, ApiError};
use airshop_storefront::cart::{Cart, CartProduct, CartStore};
use airshop_storefront::checkout::{Checkout, CheckoutError, CheckoutForm, CheckoutOutcome};
use airshop_storefront::config::{CheckoutConfig, PaymentMode};
use airshop_storefront::session::CredentialSession;
use airshop_storefront::storage::MemoryStore;

struct Shop {
    backend: FakeBackend,
    api: ApiClient,
    cart: Cart,
}

impl Shop {
    async fn open() -> Self {
        let backend = FakeBackend::start().await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let api = ApiClient::new(
            &backend.api_config(),
            CredentialSession::new(store.clone()),
        )
        .unwrap();
        Self {
            backend,
            api,
            cart: Cart::new(store),
        }
    }

    async fn add(&self, id: i64, quantity: u32) {
        let product = self.api.products().get(ProductId::new(id)).await.unwrap();
        self.cart.add(CartProduct::from(&product), quantity);
    }

    fn checkout(&self, payment_mode: PaymentMode) -> Checkout {
        let config = CheckoutConfig {
            payment_mode,
            ..CheckoutConfig::default()
        };
        Checkout::new(self.api.clone(), Arc::new(self.cart.clone()), config)
    }
}

fn form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Анна".to_string(),
        last_name: "Иванова".to_string(),
        email: "anna@example.ru".to_string(),
        phone: "+7 999 000-00-00".to_string(),
        telegram: Some("@anna".to_string()),
        address: "ул. Тверская, 1".to_string(),
        city: "Москва".to_string(),
        zip_code: "101000".to_string(),
        comment: Some("Позвонить за час".to_string()),
    }
}

#[tokio::test]
async fn test_cash_order_completes_and_clears_cart() {
    let shop = Shop::open().await;
    shop.add(3, 2).await;

    let outcome = shop
        .checkout(PaymentMode::Production)
        .place_order(&form(), PaymentMethod::Cash)
        .await
        .unwrap();

    let CheckoutOutcome::Completed { order } = outcome else {
        panic!("cash orders need no payment step");
    };
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, Decimal::new(4000, 0));
    assert_eq!(order.shipping_cost, Decimal::new(300, 0));
    assert_eq!(order.total_amount, Decimal::new(4300, 0));
    assert!(shop.cart.is_empty());
    assert!(shop.backend.payment_bodies().is_empty());
}

#[tokio::test]
async fn test_order_request_wire_shape() {
    let shop = Shop::open().await;
    shop.add(1, 1).await;
    shop.add(3, 3).await;

    shop.checkout(PaymentMode::Test)
        .place_order(&form(), PaymentMethod::Cash)
        .await
        .unwrap();

    let bodies = shop.backend.order_bodies();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert!(
        body["orderNumber"]
            .as_str()
            .unwrap()
            .starts_with("AirShop-")
    );
    assert_eq!(body["customer"]["name"], "Анна Иванова");
    assert_eq!(body["customer"]["telegram"], "@anna");
    assert_eq!(body["delivery"]["zipcode"], "101000");
    assert_eq!(body["comment"], "Позвонить за час");
    assert_eq!(body["paymentMethod"], "cash");
    assert_eq!(body["items"][0]["productId"], 1);
    assert_eq!(body["items"][1]["productId"], 3);
    assert_eq!(body["items"][1]["quantity"], 3);
}

#[tokio::test]
async fn test_test_mode_confirms_payment_locally() {
    let shop = Shop::open().await;
    shop.add(2, 1).await;

    let outcome = shop
        .checkout(PaymentMode::Test)
        .place_order(&form(), PaymentMethod::Card)
        .await
        .unwrap();

    let CheckoutOutcome::MockConfirmed { order, payment } = outcome else {
        panic!("test mode should not contact the gateway");
    };
    assert_eq!(order.status, OrderStatus::AwaitingPayment);
    assert!(payment.payment_id.unwrap().starts_with("test-"));
    assert_eq!(payment.status, Some(PaymentStatus::Pending));
    assert!(shop.backend.requests_to("/payment/create").is_empty());
    assert!(shop.cart.is_empty());
}

#[tokio::test]
async fn test_production_redirects_to_gateway() {
    let shop = Shop::open().await;
    shop.add(1, 1).await;

    let outcome = shop
        .checkout(PaymentMode::Production)
        .place_order(&form(), PaymentMethod::Sbp)
        .await
        .unwrap();

    let CheckoutOutcome::RedirectRequired {
        order,
        payment_id,
        confirmation_url,
    } = outcome
    else {
        panic!("production online payment needs a redirect");
    };
    assert_eq!(payment_id, format!("pay-{}", order.order_number));
    assert!(confirmation_url.starts_with(CONFIRMATION_URL));
    assert!(shop.cart.is_empty());

    let payments = shop.backend.payment_bodies();
    assert_eq!(payments.len(), 1);
    let payment = &payments[0];
    assert_eq!(payment["orderNumber"], order.order_number.as_str());
    assert_eq!(payment["paymentMethod"], "sbp");
    assert_eq!(payment["currency"], "RUB");
    // 12 500 is above the free shipping threshold.
    assert_eq!(payment["amount"].as_f64(), Some(12_500.0));
    assert_eq!(payment["receipt"][0]["amount"]["value"], "12500.00");
    assert_eq!(payment["receipt"][0]["quantity"], "1");
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let shop = Shop::open().await;
    shop.add(3, 2).await;
    shop.backend.fail_orders(true);

    let err = shop
        .checkout(PaymentMode::Test)
        .place_order(&form(), PaymentMethod::Cash)
        .await
        .unwrap_err();

    match err {
        CheckoutError::Api(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
    assert_eq!(shop.cart.count(), 2);
}

#[tokio::test]
async fn test_declined_payment_keeps_cart() {
    let shop = Shop::open().await;
    shop.add(1, 1).await;
    shop.backend.set_payment_behavior(PaymentBehavior::Declined);

    let err = shop
        .checkout(PaymentMode::Production)
        .place_order(&form(), PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Api(ApiError::Api { status: 400, .. })));
    assert_eq!(shop.cart.count(), 1);
    // The order itself was created before payment failed.
    assert_eq!(shop.backend.orders().len(), 1);
}

#[tokio::test]
async fn test_missing_confirmation_url_is_an_error() {
    let shop = Shop::open().await;
    shop.add(1, 1).await;
    shop.backend
        .set_payment_behavior(PaymentBehavior::NoConfirmationUrl);

    let err = shop
        .checkout(PaymentMode::Production)
        .place_order(&form(), PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::MissingConfirmation(id) if id.starts_with("pay-")));
    assert_eq!(shop.cart.count(), 1);
}

#[tokio::test]
async fn test_order_lookup_by_number() {
    let shop = Shop::open().await;
    shop.add(2, 1).await;

    let outcome = shop
        .checkout(PaymentMode::Test)
        .place_order(&form(), PaymentMethod::Cash)
        .await
        .unwrap();
    let number = outcome.order().order_number.clone();

    let lookup = shop
        .api
        .orders()
        .get_by_number(&format!("  {number} "))
        .await
        .unwrap();
    assert_eq!(lookup.order_number, number);
    assert_eq!(lookup.status, OrderStatus::Pending);
    assert_eq!(lookup.items.len(), 1);

    let err = shop
        .api
        .orders()
        .get_by_number("AirShop-0-0")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
