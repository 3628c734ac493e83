//! Cart commands.

use clap::Subcommand;

use airshop_core::{Price, ProductId};
use airshop_storefront::cart::{CartEvent, CartProduct, CartStore};
use airshop_storefront::checkout::OrderSummary;

use super::{CliError, Context, invalid_input};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: i64,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line item's quantity (values below 1 become 1)
    Set {
        /// Product ID
        id: i64,
        quantity: i64,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: i64,
    },
    /// Empty the cart
    Clear,
}

/// Run a cart command.
pub async fn run(ctx: &Context, action: CartAction) -> Result<(), CliError> {
    let badge = ctx.cart.clone();
    let json = ctx.json();
    let subscription = ctx.cart.subscribe(Box::new(move |event| {
        println!("{}", badge_line(event, badge.count(), json));
    }));

    let result = apply(ctx, action).await;
    ctx.cart.unsubscribe(subscription);
    result
}

async fn apply(ctx: &Context, action: CartAction) -> Result<(), CliError> {
    match action {
        CartAction::Show => show(ctx).await?,
        CartAction::Add { id, quantity } => {
            if quantity == 0 {
                return Err(invalid_input("quantity must be at least 1"));
            }
            let product = ctx.api.products().get(ProductId::new(id)).await?;
            if !product.is_visible {
                return Err(invalid_input(format!("product {id} is not for sale")));
            }
            ctx.cart.add(CartProduct::from(&product), quantity);
        }
        CartAction::Set { id, quantity } => {
            let product_id = ProductId::new(id);
            if !ctx.cart.read().iter().any(|i| i.product_id == product_id) {
                return Err(invalid_input(format!("product {id} is not in the cart")));
            }
            ctx.cart.update_quantity(product_id, quantity);
        }
        CartAction::Remove { id } => ctx.cart.remove(ProductId::new(id)),
        CartAction::Clear => ctx.cart.clear(),
    }
    Ok(())
}

async fn show(ctx: &Context) -> Result<(), CliError> {
    let items = ctx.cart.read();
    let currency = ctx.config.checkout.currency;

    // Shipping rules come from the backend; fall back to the defaults offline.
    let shipping = match ctx.api.settings().get().await {
        Ok(settings) => settings.shipping,
        Err(e) => {
            tracing::warn!(error = %e, "Using default shipping rules");
            airshop_storefront::api::ShippingSettings::default()
        }
    };
    let summary = OrderSummary::compute(&items, &shipping);

    if ctx.json() {
        return ctx.print_json(&serde_json::json!({
            "items": items,
            "count": summary.item_count,
            "subtotal": summary.subtotal,
            "shipping": summary.shipping,
            "total": summary.total,
        }));
    }

    if items.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }
    for item in &items {
        println!(
            "#{:<5} {:<16} {:<32} {:>3} × {:>10} = {:>10}",
            item.product_id.as_i64(),
            item.brand,
            item.name,
            item.quantity,
            Price::new(item.price, currency).display(),
            Price::new(item.line_total(), currency).display(),
        );
    }
    println!("Items:    {}", summary.item_count);
    println!("Subtotal: {}", Price::new(summary.subtotal, currency).display());
    if summary.free_shipping() {
        println!("Shipping: free");
    } else {
        println!(
            "Shipping: {} (free from {})",
            Price::new(summary.shipping, currency).display(),
            Price::new(shipping.free_shipping_threshold, currency).display()
        );
    }
    println!("Total:    {}", Price::new(summary.total, currency).display());
    Ok(())
}

/// One line per cart change: text, or a compact JSON object under `--json`.
fn badge_line(event: &CartEvent, count: u64, json: bool) -> String {
    if !json {
        return format!("{} (cart: {count} items)", describe(event));
    }

    let (kind, product_id, quantity) = match event {
        CartEvent::Added {
            product_id,
            quantity,
        } => ("added", Some(*product_id), Some(*quantity)),
        CartEvent::QuantityUpdated {
            product_id,
            quantity,
        } => ("quantity_updated", Some(*product_id), Some(*quantity)),
        CartEvent::Removed { product_id } => ("removed", Some(*product_id), None),
        CartEvent::Cleared => ("cleared", None, None),
    };
    serde_json::json!({
        "event": kind,
        "productId": product_id,
        "quantity": quantity,
        "count": count,
    })
    .to_string()
}

fn describe(event: &CartEvent) -> String {
    match event {
        CartEvent::Added {
            product_id,
            quantity,
        } => format!("Added #{product_id}, now {quantity}"),
        CartEvent::QuantityUpdated {
            product_id,
            quantity,
        } => format!("Set #{product_id} to {quantity}"),
        CartEvent::Removed { product_id } => format!("Removed #{product_id}"),
        CartEvent::Cleared => "Cart cleared".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_line_text() {
        let event = CartEvent::Added {
            product_id: ProductId::new(12),
            quantity: 3,
        };
        assert_eq!(badge_line(&event, 5, false), "Added #12, now 3 (cart: 5 items)");
    }

    #[test]
    fn test_badge_line_json_is_machine_readable() {
        let event = CartEvent::QuantityUpdated {
            product_id: ProductId::new(12),
            quantity: 2,
        };
        let value: serde_json::Value =
            serde_json::from_str(&badge_line(&event, 4, true)).unwrap();
        assert_eq!(value["event"], "quantity_updated");
        assert_eq!(value["productId"], 12);
        assert_eq!(value["quantity"], 2);
        assert_eq!(value["count"], 4);

        let value: serde_json::Value =
            serde_json::from_str(&badge_line(&CartEvent::Cleared, 0, true)).unwrap();
        assert_eq!(value["event"], "cleared");
        assert!(value["productId"].is_null());
        assert_eq!(value["count"], 0);
    }
}
