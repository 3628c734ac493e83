//! API client against the fake backend: login, bearer tokens, 401 handling,
//! error mapping and the product cache.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;

use airshop_core::{ProductCategory, ProductId};
use airshop_integration_tests::{
    ADMIN_PASSWORD, ADMIN_TOKEN, ADMIN_USERNAME, FakeBackend, SettingsBehavior,
};
use airshop_storefront::api::{ApiClient, ApiError, OrderQuery, ProductQuery, ProductUpdate};
use airshop_storefront::session::CredentialSession;
use airshop_storefront::storage::MemoryStore;
use rust_decimal::Decimal;

fn client_for(backend: &FakeBackend) -> ApiClient {
    let session = CredentialSession::new(Arc::new(MemoryStore::new()));
    ApiClient::new(&backend.api_config(), session).unwrap()
}

async fn logged_in(backend: &FakeBackend) -> ApiClient {
    let client = client_for(backend);
    client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);
    assert!(!client.session().is_authenticated());

    let user = client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap();

    assert_eq!(user.username, ADMIN_USERNAME);
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().admin_user(), Some(user));
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized_not_expired() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);

    let err = client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from("wrong"))
        .await
        .unwrap_err();

    match err {
        ApiError::Unauthorized(message) => assert_eq!(message, "Invalid username or password"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_bearer_token_sent_only_when_logged_in() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);

    client.products().get(ProductId::new(1)).await.unwrap();
    assert_eq!(backend.requests_to("/products/1")[0].authorization, None);

    client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap();
    client.auth().verify().await.unwrap();

    let verify = backend.requests_to("/auth/verify");
    assert_eq!(
        verify[0].authorization.as_deref(),
        Some(format!("Bearer {ADMIN_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_rejected_token_clears_credentials() {
    let backend = FakeBackend::start().await.unwrap();
    let client = logged_in(&backend).await;

    backend.revoke_token();
    let err = client.auth().verify().await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(!client.session().is_authenticated());
    assert!(client.session().admin_user().is_none());
}

#[tokio::test]
async fn test_logout_forgets_credentials() {
    let backend = FakeBackend::start().await.unwrap();
    let client = logged_in(&backend).await;

    client.auth().logout().unwrap();
    assert!(!client.session().is_authenticated());

    let err = client.orders().list(&OrderQuery::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert_eq!(backend.requests_to("/orders")[0].authorization, None);
}

#[tokio::test]
async fn test_product_reads_are_cached() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);
    let query = ProductQuery::default();

    let first = client.products().list(&query).await.unwrap();
    let second = client.products().list(&query).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3, "hidden product is not listed");
    assert_eq!(backend.product_list_hits(), 1);

    let men = ProductQuery {
        category: Some(ProductCategory::Men),
        ..ProductQuery::default()
    };
    let men = client.products().list(&men).await.unwrap();
    assert_eq!(men.len(), 2);
    assert_eq!(backend.product_list_hits(), 2);
}

#[tokio::test]
async fn test_search_bypasses_cache() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);
    let query = ProductQuery {
        search: Some("dior".to_string()),
        ..ProductQuery::default()
    };

    client.products().list(&query).await.unwrap();
    client.products().list(&query).await.unwrap();
    assert_eq!(backend.product_list_hits(), 2);
}

#[tokio::test]
async fn test_admin_write_invalidates_cache() {
    let backend = FakeBackend::start().await.unwrap();
    let client = logged_in(&backend).await;

    let before = client.products().get(ProductId::new(3)).await.unwrap();
    assert_eq!(before.price, Decimal::new(2000, 0));
    client.products().list(&ProductQuery::default()).await.unwrap();

    let update = ProductUpdate {
        price: Some(Decimal::new(2500, 0)),
        ..ProductUpdate::default()
    };
    client
        .products()
        .update(ProductId::new(3), &update)
        .await
        .unwrap();

    let after = client.products().get(ProductId::new(3)).await.unwrap();
    assert_eq!(after.price, Decimal::new(2500, 0));
    client.products().list(&ProductQuery::default()).await.unwrap();
    assert_eq!(backend.product_list_hits(), 2);
    assert_eq!(backend.requests_to("/products/3").len(), 3);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);

    let err = client.products().get(ProductId::new(99)).await.unwrap_err();
    match err {
        ApiError::NotFound(message) => assert_eq!(message, "Product not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_settings_defaults() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);

    let settings = client.settings().get().await.unwrap();
    assert_eq!(settings.shipping.free_shipping_threshold, Decimal::new(5000, 0));
}

#[tokio::test]
async fn test_rate_limit_uses_retry_after() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);

    backend.set_settings_behavior(SettingsBehavior::RateLimited(Some(7)));
    let err = client.settings().get().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited(7)), "{err:?}");

    backend.set_settings_behavior(SettingsBehavior::RateLimited(None));
    let err = client.settings().get().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited(60)), "{err:?}");
}

#[tokio::test]
async fn test_error_message_falls_back_to_body_text() {
    let backend = FakeBackend::start().await.unwrap();
    let client = client_for(&backend);

    backend.set_settings_behavior(SettingsBehavior::PlainTextError(
        "upstream exploded".to_string(),
    ));
    match client.settings().get().await.unwrap_err() {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    backend.set_settings_behavior(SettingsBehavior::MessageError(
        "Maintenance window".to_string(),
    ));
    match client.settings().get().await.unwrap_err() {
        ApiError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Maintenance window");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
