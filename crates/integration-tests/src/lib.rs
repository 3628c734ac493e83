//! Integration tests for the AirShop storefront client.
//!
//! [`FakeBackend`] runs an in-process axum server that speaks the subset of
//! the AirShop REST API the client uses, records every request, and can be
//! told to fail in specific ways.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p airshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - authentication, bearer tokens, product cache
//! - `checkout_flow` - order placement for every payment path
//! - `cart_persistence` - file-backed cart across instances
//! - `error_reporting` - which failures reach Sentry

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use airshop_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductCategory, ProductId};
use airshop_storefront::api::{
    Customer, Delivery, NewProduct, Order, OrderItem, OrderLookup, Product, ProductUpdate,
    SiteSettings,
};
use airshop_storefront::config::ApiConfig;

/// Token issued by a successful login.
pub const ADMIN_TOKEN: &str = "fake-admin-token";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Confirmation URL prefix handed out for gateway payments.
pub const CONFIRMATION_URL: &str = "https://gateway.test/confirm";

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// How `POST /payment/create` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentBehavior {
    /// Payment created with a confirmation URL.
    #[default]
    Redirect,
    /// Payment created, but no confirmation URL.
    NoConfirmationUrl,
    /// 400 with `success: false`.
    Declined,
}

/// How `GET /settings` answers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettingsBehavior {
    /// 200 with the default settings.
    #[default]
    Normal,
    /// 429, with `Retry-After` when given.
    RateLimited(Option<u64>),
    /// 500 with a plain-text body.
    PlainTextError(String),
    /// 503 with `{"message": ...}` instead of `{"error": ...}`.
    MessageError(String),
}

#[derive(Default)]
struct BackendState {
    products: Mutex<Vec<Product>>,
    orders: Mutex<Vec<Order>>,
    requests: Mutex<Vec<RecordedRequest>>,
    order_bodies: Mutex<Vec<Value>>,
    payment_bodies: Mutex<Vec<Value>>,
    product_list_hits: AtomicUsize,
    token_revoked: AtomicBool,
    fail_orders: AtomicBool,
    payment: Mutex<PaymentBehavior>,
    settings: Mutex<SettingsBehavior>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process fake of the AirShop backend, served under `/api`.
///
/// The server stops when the value is dropped.
pub struct FakeBackend {
    base_url: String,
    state: Arc<BackendState>,
    server: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Start a backend seeded with [`seed_products`] on a free local port.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(BackendState::default());
        *lock(&state.products) = seed_products();

        let app = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api"),
            state,
            server,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests received for `path` (without the `/api` prefix).
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.path == full)
            .collect()
    }

    /// Number of `GET /products` requests served.
    #[must_use]
    pub fn product_list_hits(&self) -> usize {
        self.state.product_list_hits.load(Ordering::SeqCst)
    }

    /// Reject [`ADMIN_TOKEN`] from now on, as if it had expired.
    pub fn revoke_token(&self) {
        self.state.token_revoked.store(true, Ordering::SeqCst);
    }

    /// Make `POST /orders` answer 500.
    pub fn fail_orders(&self, fail: bool) {
        self.state.fail_orders.store(fail, Ordering::SeqCst);
    }

    pub fn set_payment_behavior(&self, behavior: PaymentBehavior) {
        *lock(&self.state.payment) = behavior;
    }

    pub fn set_settings_behavior(&self, behavior: SettingsBehavior) {
        *lock(&self.state.settings) = behavior;
    }

    /// Bodies of every `POST /orders` received.
    #[must_use]
    pub fn order_bodies(&self) -> Vec<Value> {
        lock(&self.state.order_bodies).clone()
    }

    /// Bodies of every `POST /payment/create` received.
    #[must_use]
    pub fn payment_bodies(&self) -> Vec<Value> {
        lock(&self.state.payment_bodies).clone()
    }

    /// Orders stored so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        lock(&self.state.orders).clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Catalog the backend starts with. Product 4 is hidden.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    vec![
        product(1, "Sauvage", "DIOR", 12_500, ProductCategory::Men, true),
        product(2, "No 5", "CHANEL", 15_000, ProductCategory::Women, true),
        product(3, "Eros", "VERSACE", 2_000, ProductCategory::Men, true),
        product(4, "Gypsy Water", "BYREDO", 18_000, ProductCategory::Unisex, false),
    ]
}

fn product(
    id: i64,
    name: &str,
    brand: &str,
    price: i64,
    category: ProductCategory,
    is_visible: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        brand: brand.to_string(),
        price: Decimal::new(price, 0),
        old_price: None,
        discount: 0,
        volume: "100мл".to_string(),
        category,
        description: None,
        image: format!("https://cdn.test/{id}.jpg"),
        is_featured: false,
        is_new: false,
        is_visible,
        created_at: None,
        updated_at: None,
    }
}

fn router(state: Arc<BackendState>) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/by-number/{number}", get(order_by_number))
        .route("/payment/create", post(create_payment))
        .route("/settings", get(get_settings))
        .with_state(Arc::clone(&state));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state, record))
}

async fn record(State(state): State<Arc<BackendState>>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    lock(&state.requests).push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization,
    });

    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {ADMIN_TOKEN}");
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        None => Err(error(StatusCode::UNAUTHORIZED, "Missing Authorization Header")),
        Some(value) if value == expected && !state.token_revoked.load(Ordering::SeqCst) => Ok(()),
        Some(_) => Err(error(StatusCode::UNAUTHORIZED, "Token has expired")),
    }
}

fn admin_user() -> Value {
    json!({
        "id": 1,
        "username": ADMIN_USERNAME,
        "email": "admin@airshop.test",
        "role": "superadmin",
        "isActive": true,
        "createdAt": "2025-01-10T09:00:00",
        "lastLogin": null,
    })
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.username == ADMIN_USERNAME && body.password == ADMIN_PASSWORD {
        Json(json!({ "access_token": ADMIN_TOKEN, "user": admin_user() })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid username or password")
    }
}

async fn verify(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    Json(json!({ "user": admin_user() })).into_response()
}

#[derive(Deserialize)]
struct ProductParams {
    category: Option<String>,
    visible: Option<String>,
}

async fn list_products(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<ProductParams>,
) -> Response {
    state.product_list_hits.fetch_add(1, Ordering::SeqCst);
    let visible_only = params.visible.as_deref() != Some("false");

    let products: Vec<Product> = lock(&state.products)
        .iter()
        .filter(|p| !visible_only || p.is_visible)
        .filter(|p| {
            params
                .category
                .as_deref()
                .is_none_or(|c| p.category.as_str() == c)
        })
        .cloned()
        .collect();

    Json(json!({ "products": products })).into_response()
}

async fn get_product(State(state): State<Arc<BackendState>>, Path(id): Path<i64>) -> Response {
    lock(&state.products)
        .iter()
        .find(|p| p.id == ProductId::new(id))
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(json!({ "product": p })).into_response(),
        )
}

async fn create_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(new): Json<NewProduct>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let mut products = lock(&state.products);
    let id = products.iter().map(|p| p.id.as_i64()).max().unwrap_or(0) + 1;
    let created = Product {
        id: ProductId::new(id),
        name: new.name,
        brand: new.brand,
        price: new.price,
        old_price: new.old_price,
        discount: new.discount,
        volume: new.volume,
        category: new.category,
        description: Some(new.description).filter(|d| !d.is_empty()),
        image: new.image,
        is_featured: new.is_featured,
        is_new: new.is_new,
        is_visible: new.is_visible,
        created_at: None,
        updated_at: None,
    };
    products.push(created.clone());

    (StatusCode::CREATED, Json(json!({ "product": created }))).into_response()
}

async fn update_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(update): Json<ProductUpdate>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let mut products = lock(&state.products);
    let Some(product) = products.iter_mut().find(|p| p.id == ProductId::new(id)) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    if let Some(name) = update.name {
        product.name = name;
    }
    if let Some(price) = update.price {
        product.price = price;
    }
    if let Some(is_visible) = update.is_visible {
        product.is_visible = is_visible;
    }

    Json(json!({ "product": product })).into_response()
}

async fn delete_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let mut products = lock(&state.products);
    let before = products.len();
    products.retain(|p| p.id != ProductId::new(id));
    if products.len() == before {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    Json(json!({ "message": "Product deleted" })).into_response()
}

async fn list_orders(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let orders = lock(&state.orders);
    let newest_first: Vec<&Order> = orders.iter().rev().collect();
    Json(json!({ "orders": newest_first, "total": orders.len() })).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderBody {
    order_number: String,
    customer: Customer,
    delivery: Delivery,
    #[serde(default)]
    comment: Option<String>,
    items: Vec<OrderItemBody>,
    payment_method: PaymentMethod,
    #[serde(default)]
    payment_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemBody {
    product_id: ProductId,
    quantity: u32,
}

async fn create_order(State(state): State<Arc<BackendState>>, Json(raw): Json<Value>) -> Response {
    lock(&state.order_bodies).push(raw.clone());

    if state.fail_orders.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    let Ok(body) = serde_json::from_value::<OrderBody>(raw) else {
        return error(StatusCode::BAD_REQUEST, "Invalid order");
    };
    if body.items.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Order has no items");
    }

    let mut items = Vec::with_capacity(body.items.len());
    {
        let products = lock(&state.products);
        for (index, line) in body.items.iter().enumerate() {
            let Some(product) = products.iter().find(|p| p.id == line.product_id) else {
                return error(
                    StatusCode::NOT_FOUND,
                    &format!("Product {} not found", line.product_id),
                );
            };
            items.push(OrderItem {
                id: OrderItemId::new(i64::try_from(index).unwrap_or(i64::MAX) + 1),
                product_id: product.id,
                product_name: product.name.clone(),
                product_price: product.price,
                quantity: line.quantity,
                total: product.price * Decimal::from(line.quantity),
            });
        }
    }

    let subtotal: Decimal = items.iter().map(|i| i.total).sum();
    let shipping_cost = if subtotal >= Decimal::new(5000, 0) {
        Decimal::ZERO
    } else {
        Decimal::new(300, 0)
    };
    let status = if body.payment_method.is_online() {
        OrderStatus::AwaitingPayment
    } else {
        OrderStatus::Pending
    };

    let mut orders = lock(&state.orders);
    let order = Order {
        id: OrderId::new(i64::try_from(orders.len()).unwrap_or(i64::MAX) + 1),
        order_number: body.order_number,
        customer: body.customer,
        delivery: body.delivery,
        comment: body.comment,
        subtotal,
        shipping_cost,
        total_amount: subtotal + shipping_cost,
        payment_method: body.payment_method,
        payment_id: body.payment_id,
        status,
        created_at: Some(chrono::Utc::now().naive_utc()),
        updated_at: None,
        items,
    };
    orders.push(order.clone());

    (StatusCode::CREATED, Json(json!({ "order": order }))).into_response()
}

async fn order_by_number(
    State(state): State<Arc<BackendState>>,
    Path(number): Path<String>,
) -> Response {
    lock(&state.orders)
        .iter()
        .find(|o| o.order_number == number)
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Order not found"),
            |o| {
                let lookup = OrderLookup {
                    order_number: o.order_number.clone(),
                    status: o.status,
                    total_amount: o.total_amount,
                    created_at: o.created_at,
                    items: o.items.clone(),
                };
                Json(json!({ "order": lookup })).into_response()
            },
        )
}

async fn create_payment(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> Response {
    let order_number = body
        .get("orderNumber")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    lock(&state.payment_bodies).push(body);

    let payment_id = format!("pay-{order_number}");
    match *lock(&state.payment) {
        PaymentBehavior::Redirect => Json(json!({
            "success": true,
            "payment_id": payment_id,
            "confirmation_url": format!("{CONFIRMATION_URL}/{payment_id}"),
            "status": "pending",
        }))
        .into_response(),
        PaymentBehavior::NoConfirmationUrl => Json(json!({
            "success": true,
            "payment_id": payment_id,
            "status": "pending",
        }))
        .into_response(),
        PaymentBehavior::Declined => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Card declined" })),
        )
            .into_response(),
    }
}

async fn get_settings(State(state): State<Arc<BackendState>>) -> Response {
    let behavior = lock(&state.settings).clone();
    match behavior {
        SettingsBehavior::Normal => {
            Json(json!({ "settings": SiteSettings::default() })).into_response()
        }
        SettingsBehavior::RateLimited(retry_after) => {
            let mut response = error(StatusCode::TOO_MANY_REQUESTS, "Too many requests");
            if let Some(seconds) = retry_after {
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, seconds.into());
            }
            response
        }
        SettingsBehavior::PlainTextError(text) => {
            (StatusCode::INTERNAL_SERVER_ERROR, text).into_response()
        }
        SettingsBehavior::MessageError(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": message })),
        )
            .into_response(),
    }
}
