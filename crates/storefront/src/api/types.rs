//! Request and response bodies for the AirShop REST API.
//!
//! Field names follow the backend: camelCase for resources, snake_case for
//! the auth token, payment and stats payloads. Money is sent and received as
//! JSON numbers.

use airshop_core::{
    AdminRole, AdminUserId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus,
    ProductCategory, ProductId,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

/// Admin account as returned by `/auth/login` and `/auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access_token: String,
    pub user: AdminUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: AdminUser,
}

// =============================================================================
// Products
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub old_price: Option<Decimal>,
    #[serde(default)]
    pub discount: u32,
    #[serde(default)]
    pub volume: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Filters for `GET /products`. Unset fields are left to backend defaults,
/// which hide invisible products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Body for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub old_price: Option<Decimal>,
    #[serde(default)]
    pub discount: u32,
    pub volume: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

/// Partial product update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub old_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl ProductUpdate {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkCreateRequest<'a> {
    pub products: &'a [NewProduct],
}

/// Result of `POST /products/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreated {
    pub created: u64,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CsvImportRequest<'a> {
    pub csv_data: &'a str,
}

/// Result of `POST /admin/import-csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvImportReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub imported: u64,
    /// Rows the backend skipped; `null` when every row was imported.
    #[serde(default)]
    pub errors: Option<Vec<CsvRowError>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One rejected CSV row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRowError {
    pub row: u64,
    pub error: String,
}

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Orders
// =============================================================================

/// Shopper contact details on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub telegram: Option<String>,
}

/// Delivery address on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub address: String,
    pub city: String,
    pub zipcode: String,
}

/// Line of an order submission. The backend re-prices from its catalog;
/// `price` is the price the shopper saw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_number: String,
    pub customer: Customer,
    pub delivery: Delivery,
    pub comment: String,
    pub items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
}

/// Product line of a stored order, priced at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer: Customer,
    pub delivery: Delivery,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Public view of an order, from `GET /orders/by-number/{number}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLookup {
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Filters for `GET /orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// One page of orders, newest first, with the unpaginated total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope<T> {
    pub order: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

/// Order counts by status plus revenue, from `GET /orders/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub total: u64,
    pub pending: u64,
    pub awaiting_payment: u64,
    pub paid: u64,
    pub processing: u64,
    pub shipping: u64,
    pub delivered: u64,
    pub canceled: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

impl OrderStats {
    /// Count for a single status.
    #[must_use]
    pub const fn count(&self, status: OrderStatus) -> u64 {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::AwaitingPayment => self.awaiting_payment,
            OrderStatus::Paid => self.paid,
            OrderStatus::Processing => self.processing,
            OrderStatus::Shipping => self.shipping,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Canceled => self.canceled,
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Money value as the gateway expects it: a 2-decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptAmount {
    pub value: String,
    pub currency: String,
}

/// One fiscal receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub description: String,
    pub quantity: String,
    pub amount: ReceiptAmount,
    pub vat_code: u8,
    pub payment_mode: String,
    pub payment_subject: String,
}

/// Body for `POST /payment/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    /// Gateway method code (`bank_card`, `sbp`).
    pub payment_method: String,
    pub return_url: String,
    pub receipt: Vec<ReceiptItem>,
}

/// Outcome of a payment creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCreated {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub confirmation_url: Option<String>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Gateway status of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentState {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefundRequest<'a> {
    pub payment_id: &'a str,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

/// Outcome of a refund request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub refund_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Settings
// =============================================================================

/// Editable site content and shop rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub hero: HeroSettings,
    #[serde(default)]
    pub contact: ContactSettings,
    #[serde(default)]
    pub shipping: ShippingSettings,
    #[serde(default)]
    pub business: BusinessSettings,
}

/// Home page banner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSettings {
    pub title: String,
    pub subtitle: String,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            title: "Добро пожаловать в AirShop".to_string(),
            subtitle: "Откройте для себя мир изысканных ароматов".to_string(),
        }
    }
}

/// Shop contact channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSettings {
    pub phone: String,
    pub email: String,
    pub telegram: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            phone: "+7 (999) 123-45-67".to_string(),
            email: "info@airshop.ru".to_string(),
            telegram: "@airshop_support".to_string(),
        }
    }
}

/// Shipping charge rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSettings {
    /// Subtotal at or above which shipping is free
    #[serde(with = "rust_decimal::serde::float")]
    pub free_shipping_threshold: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub standard_shipping_cost: Decimal,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(5000, 0),
            standard_shipping_cost: Decimal::new(300, 0),
        }
    }
}

/// Company details shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub company_name: String,
    pub address: String,
    pub working_hours: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            company_name: "AirShop".to_string(),
            address: "Москва, Россия".to_string(),
            working_hours: "Пн-Пт: 10:00 - 20:00".to_string(),
        }
    }
}

/// Partial hero update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeroUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Partial contact update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SettingsEnvelope<T> {
    pub settings: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeroEnvelope {
    pub hero: HeroSettings,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactEnvelope {
    pub contact: ContactSettings,
}

/// Backend error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": 12,
            "name": "Sauvage",
            "brand": "DIOR",
            "price": 12500.0,
            "oldPrice": null,
            "discount": 0,
            "volume": "100мл",
            "category": "men",
            "description": "Fresh",
            "image": "https://cdn.example/sauvage.jpg",
            "isFeatured": true,
            "isNew": false,
            "isVisible": true,
            "createdAt": "2025-03-01T12:30:45.123456",
            "updatedAt": null
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.price, Decimal::new(12500, 0));
        assert_eq!(product.category, ProductCategory::Men);
        assert!(product.is_featured);
        assert!(product.old_price.is_none());
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            order_number: "AirShop-1-2".to_string(),
            customer: Customer {
                name: "Анна Иванова".to_string(),
                email: "anna@example.ru".to_string(),
                phone: "+79990000000".to_string(),
                telegram: None,
            },
            delivery: Delivery {
                address: "ул. Тверская, 1".to_string(),
                city: "Москва".to_string(),
                zipcode: "101000".to_string(),
            },
            comment: String::new(),
            items: vec![OrderItemRequest {
                product_id: ProductId::new(3),
                quantity: 2,
                price: Decimal::new(4990, 0),
            }],
            payment_method: PaymentMethod::Sbp,
            payment_id: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["orderNumber"], "AirShop-1-2");
        assert_eq!(value["paymentMethod"], "sbp");
        assert_eq!(value["items"][0]["productId"], 3);
        assert_eq!(value["items"][0]["price"], 4990.0);
        assert_eq!(value["delivery"]["zipcode"], "101000");
        assert!(value["paymentId"].is_null());
    }

    #[test]
    fn test_product_update_sends_only_set_fields() {
        let update = ProductUpdate {
            price: Some(Decimal::new(9900, 0)),
            is_visible: Some(false),
            ..ProductUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(value["price"], 9900.0);
        assert_eq!(value["isVisible"], false);
        assert!(ProductUpdate::default().is_empty());
    }

    #[test]
    fn test_settings_tolerate_missing_sections() {
        let settings: SiteSettings =
            serde_json::from_str(r#"{"hero":{"title":"Hi","subtitle":"There"}}"#).unwrap();
        assert_eq!(settings.hero.title, "Hi");
        assert_eq!(settings.shipping, ShippingSettings::default());
        assert_eq!(settings.contact.email, "info@airshop.ru");
    }

    #[test]
    fn test_order_stats_count_by_status() {
        let stats: OrderStats = serde_json::from_str(
            r#"{"total":5,"pending":1,"awaiting_payment":1,"paid":2,"processing":0,
                "shipping":0,"delivered":1,"canceled":0,"total_revenue":15300.5}"#,
        )
        .unwrap();
        assert_eq!(stats.count(OrderStatus::Paid), 2);
        assert_eq!(stats.total_revenue, Decimal::new(153_005, 1));
    }
}
