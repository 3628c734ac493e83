//! File-backed cart and session across process restarts.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;

use airshop_core::ProductId;
use airshop_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, FakeBackend};
use airshop_storefront::api::ApiClient;
use airshop_storefront::cart::{Cart, CartProduct, CartStore};
use airshop_storefront::catalog::SearchHistory;
use airshop_storefront::session::CredentialSession;
use airshop_storefront::storage::{FileStore, KeyValueStore, keys};

fn perfume(id: i64, price: i64) -> CartProduct {
    CartProduct {
        product_id: ProductId::new(id),
        name: format!("Perfume {id}"),
        brand: "MONTALE".to_string(),
        image: String::new(),
        price: Decimal::new(price, 0),
        volume: "50мл".to_string(),
    }
}

fn open_cart(dir: &std::path::Path) -> Cart {
    Cart::new(Arc::new(FileStore::open(dir).unwrap()))
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let cart = open_cart(dir.path());
    cart.add(perfume(1, 1000), 2);
    cart.add(perfume(2, 500), 1);
    cart.update_quantity(ProductId::new(2), 4);
    drop(cart);

    let reopened = open_cart(dir.path());
    let items = reopened.read();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_id, ProductId::new(1));
    assert_eq!(items[1].quantity, 4);
    assert_eq!(reopened.total(), Decimal::new(4000, 0));
    assert_eq!(reopened.count(), 6);
}

#[test]
fn test_two_carts_on_one_directory_see_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let first = open_cart(dir.path());
    let second = open_cart(dir.path());

    first.add(perfume(1, 1000), 1);
    second.add(perfume(1, 1000), 2);

    assert_eq!(first.count(), 3);
    assert_eq!(second.read().len(), 1);
}

#[test]
fn test_corrupt_cart_file_reads_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    store.set(keys::CART, "[{\"id\": 1, \"quantity\":").unwrap();

    let cart = Cart::new(store);
    assert!(cart.is_empty());

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    cart.subscribe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    cart.add(perfume(7, 300), 1);
    assert_eq!(cart.count(), 1);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[test]
fn test_search_history_persists() {
    let dir = tempfile::tempdir().unwrap();
    let history = SearchHistory::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    history.record("dior");
    history.record("chanel");

    let reopened = SearchHistory::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    assert_eq!(reopened.entries(), vec!["chanel", "dior"]);
}

#[tokio::test]
async fn test_admin_session_survives_restart() {
    let backend = FakeBackend::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let session = CredentialSession::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    let client = ApiClient::new(&backend.api_config(), session).unwrap();
    client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap();
    drop(client);

    let session = CredentialSession::new(Arc::new(FileStore::open(dir.path()).unwrap()));
    let client = ApiClient::new(&backend.api_config(), session).unwrap();
    assert!(client.session().is_authenticated());

    let user = client.auth().verify().await.unwrap();
    assert_eq!(user.username, ADMIN_USERNAME);
}
