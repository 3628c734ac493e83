//! Public order lookup.

use clap::Subcommand;

use airshop_core::Price;

use super::{CliError, Context};

#[derive(Subcommand)]
pub enum OrderAction {
    /// Show the status of an order by its number
    Status {
        /// Order number, e.g. `AirShop-1741000000000-42`
        number: String,
    },
}

/// Run an order command.
pub async fn run(ctx: &Context, action: OrderAction) -> Result<(), CliError> {
    match action {
        OrderAction::Status { number } => {
            let order = ctx.api.orders().get_by_number(&number).await?;
            if ctx.json() {
                return ctx.print_json(&order);
            }

            let currency = ctx.config.checkout.currency;
            println!("Order {}: {}", order.order_number, order.status);
            if let Some(created_at) = order.created_at {
                println!("Placed {}", created_at.format("%d.%m.%Y %H:%M"));
            }
            for item in &order.items {
                println!(
                    "  {} × {} = {}",
                    item.product_name,
                    item.quantity,
                    Price::new(item.total, currency).display()
                );
            }
            println!("Total: {}", Price::new(order.total_amount, currency).display());
        }
    }
    Ok(())
}
