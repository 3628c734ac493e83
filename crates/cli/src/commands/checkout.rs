//! Checkout command.

use std::sync::Arc;

use clap::Args;

use airshop_core::{PaymentMethod, Price};
use airshop_storefront::checkout::{Checkout, CheckoutForm, CheckoutOutcome};

use super::{CliError, Context};

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    /// Telegram handle for order updates
    #[arg(long)]
    telegram: Option<String>,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    /// Postal code
    #[arg(long)]
    zip: String,
    #[arg(long)]
    comment: Option<String>,
    /// Payment method (`card`, `sbp`, `cash`)
    #[arg(long, default_value = "card")]
    payment: PaymentMethod,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            telegram: args.telegram,
            address: args.address,
            city: args.city,
            zip_code: args.zip,
            comment: args.comment,
        }
    }
}

/// Place an order for the cart contents.
pub async fn run(ctx: &Context, args: CheckoutArgs) -> Result<(), CliError> {
    let payment_method = args.payment;
    let checkout = Checkout::new(
        ctx.api.clone(),
        Arc::new(ctx.cart.clone()),
        ctx.config.checkout.clone(),
    );

    let outcome = checkout
        .place_order(&CheckoutForm::from(args), payment_method)
        .await?;

    if ctx.json() {
        return ctx.print_json(&serde_json::json!({
            "order": outcome.order(),
            "payment": match &outcome {
                CheckoutOutcome::Completed { .. } => serde_json::Value::Null,
                CheckoutOutcome::MockConfirmed { payment, .. } => serde_json::json!(payment),
                CheckoutOutcome::RedirectRequired { payment_id, confirmation_url, .. } => {
                    serde_json::json!({
                        "paymentId": payment_id,
                        "confirmationUrl": confirmation_url,
                    })
                }
            },
        }));
    }

    let order = outcome.order();
    println!(
        "Order {} placed: {}",
        order.order_number,
        Price::new(order.total_amount, ctx.config.checkout.currency).display()
    );
    match &outcome {
        CheckoutOutcome::Completed { .. } => println!("Pay on delivery."),
        CheckoutOutcome::MockConfirmed { payment, .. } => println!(
            "Test payment {} confirmed.",
            payment.payment_id.as_deref().unwrap_or_default()
        ),
        CheckoutOutcome::RedirectRequired {
            confirmation_url, ..
        } => println!("Complete payment at {confirmation_url}"),
    }
    Ok(())
}
