//! Order totals, order numbers and fiscal receipt lines.

use airshop_core::{CurrencyCode, format_amount};
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;

use crate::api::{ReceiptAmount, ReceiptItem, ShippingSettings};
use crate::cart::CartLineItem;

/// Receipt VAT code the shop is registered with.
const VAT_CODE: u8 = 1;

/// Cart totals shown before the order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}

impl OrderSummary {
    /// Totals for `items` under `shipping`: delivery is free once the
    /// subtotal reaches the threshold. An empty cart costs nothing.
    #[must_use]
    pub fn compute(items: &[CartLineItem], shipping: &ShippingSettings) -> Self {
        let subtotal: Decimal = items.iter().map(CartLineItem::line_total).sum();
        let item_count = items.iter().map(|i| u64::from(i.quantity)).sum();

        let shipping = if items.is_empty() || subtotal >= shipping.free_shipping_threshold {
            Decimal::ZERO
        } else {
            shipping.standard_shipping_cost
        };

        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count,
        }
    }

    /// Whether delivery is free.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// New order number: `AirShop-<unix millis>-<0..999>`.
#[must_use]
pub fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::rng().random_range(0..1000);
    format!("AirShop-{millis}-{suffix}")
}

/// Receipt lines for the payment gateway, one per cart line.
#[must_use]
pub fn receipt_items(items: &[CartLineItem], currency: CurrencyCode) -> Vec<ReceiptItem> {
    items
        .iter()
        .map(|item| ReceiptItem {
            description: item.name.clone(),
            quantity: item.quantity.to_string(),
            amount: ReceiptAmount {
                value: format_amount(item.price),
                currency: currency.code().to_string(),
            },
            vat_code: VAT_CODE,
            payment_mode: "full_prepayment".to_string(),
            payment_subject: "commodity".to_string(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use airshop_core::ProductId;

    use super::*;

    fn line(id: i64, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            name: format!("Perfume {id}"),
            brand: "DIOR".to_string(),
            image: String::new(),
            price: Decimal::new(price, 0),
            volume: "100мл".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_shipping_charged_below_threshold() {
        let summary = OrderSummary::compute(
            &[line(1, 1000, 2), line(2, 500, 1)],
            &ShippingSettings::default(),
        );
        assert_eq!(summary.subtotal, Decimal::new(2500, 0));
        assert_eq!(summary.shipping, Decimal::new(300, 0));
        assert_eq!(summary.total, Decimal::new(2800, 0));
        assert_eq!(summary.item_count, 3);
        assert!(!summary.free_shipping());
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let summary = OrderSummary::compute(&[line(1, 2500, 2)], &ShippingSettings::default());
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::new(5000, 0));
    }

    #[test]
    fn test_empty_cart_summary() {
        let summary = OrderSummary::compute(&[], &ShippingSettings::default());
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "AirShop");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert!(parts[2].parse::<u16>().unwrap() < 1000);
    }

    #[test]
    fn test_receipt_items() {
        let mut item = line(1, 0, 3);
        item.price = Decimal::new(49_995, 1);
        let receipt = receipt_items(&[item], CurrencyCode::RUB);

        assert_eq!(receipt.len(), 1);
        assert_eq!(receipt[0].quantity, "3");
        assert_eq!(receipt[0].amount.value, "4999.50");
        assert_eq!(receipt[0].amount.currency, "RUB");
        assert_eq!(receipt[0].vat_code, 1);
        assert_eq!(receipt[0].payment_mode, "full_prepayment");
    }
}
