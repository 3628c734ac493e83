//! Which client failures are logged at a level Sentry records as an event.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use sentry::protocol::Event;
use tracing_subscriber::layer::SubscriberExt;

use airshop_integration_tests::{
    ADMIN_PASSWORD, ADMIN_USERNAME, FakeBackend, PaymentBehavior, SettingsBehavior,
};
use airshop_storefront::api::{ApiClient, ApiError, PaymentRequest};
use airshop_storefront::session::CredentialSession;
use airshop_storefront::storage::MemoryStore;

/// Same split the CLI installs: WARN and above become events.
fn event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => EventFilter::Breadcrumb,
        tracing::Level::TRACE => EventFilter::Ignore,
    }
}

/// Run `scenario` on a current-thread runtime with the Sentry tracing layer
/// installed and return the captured events.
fn captured<F, Fut>(scenario: F) -> Vec<Event<'static>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    sentry::test::with_captured_events(|| {
        let subscriber =
            tracing_subscriber::registry().with(sentry_tracing::layer().event_filter(event_filter));
        let _guard = tracing::subscriber::set_default(subscriber);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(scenario());
    })
}

fn client_for(backend: &FakeBackend) -> ApiClient {
    let session = CredentialSession::new(Arc::new(MemoryStore::new()));
    ApiClient::new(&backend.api_config(), session).unwrap()
}

fn payment_request() -> PaymentRequest {
    PaymentRequest {
        order_number: "AirShop-1-1".to_string(),
        amount: Decimal::new(1000, 0),
        currency: "RUB".to_string(),
        payment_method: "bank_card".to_string(),
        return_url: "http://localhost:3000/payment/success".to_string(),
        receipt: Vec::new(),
    }
}

#[test]
fn test_client_errors_are_not_events() {
    let events = captured(|| async {
        let backend = FakeBackend::start().await.unwrap();
        let client = client_for(&backend);

        let err = client
            .auth()
            .login(ADMIN_USERNAME, &SecretString::from("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        client
            .auth()
            .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
            .await
            .unwrap();
        backend.revoke_token();
        let err = client.auth().verify().await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));

        backend.set_payment_behavior(PaymentBehavior::Declined);
        let err = client.payment().create(&payment_request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 400, .. }), "{err:?}");

        let err = client
            .orders()
            .get_by_number("AirShop-0-0")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    });

    assert!(events.is_empty(), "unexpected events: {events:?}");
}

#[test]
fn test_server_error_is_one_event() {
    let events = captured(|| async {
        let backend = FakeBackend::start().await.unwrap();
        let client = client_for(&backend);
        backend.set_settings_behavior(SettingsBehavior::PlainTextError("boom".to_string()));

        let err = client.settings().get().await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 500, .. }));
    });

    assert_eq!(events.len(), 1);
}
