//! Admin order and payment management.

use clap::Subcommand;
use rust_decimal::Decimal;

use airshop_core::{OrderId, OrderStatus, Price};
use airshop_storefront::api::{Order, OrderQuery};

use crate::commands::{CliError, Context};

#[derive(Subcommand)]
pub enum OrderCommand {
    /// List orders, newest first
    List {
        /// Only orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one order with its items
    Show {
        /// Order ID
        id: i64,
    },
    /// Move an order to a new status
    Status {
        /// Order ID
        id: i64,
        status: OrderStatus,
    },
    /// Delete an order
    Delete {
        /// Order ID
        id: i64,
    },
    /// Order counts by status and revenue
    Stats,
}

#[derive(Subcommand)]
pub enum PaymentCommand {
    /// Gateway status of a payment
    Status {
        payment_id: String,
    },
    /// Refund a payment, fully or in part
    Refund {
        payment_id: String,
        /// Amount to refund; the whole payment when omitted
        #[arg(long)]
        amount: Option<Decimal>,
    },
}

/// Run an order command.
pub async fn run(ctx: &Context, action: OrderCommand) -> Result<(), CliError> {
    let orders = ctx.api.orders();
    let currency = ctx.config.checkout.currency;

    match action {
        OrderCommand::List {
            status,
            limit,
            offset,
        } => {
            let query = OrderQuery {
                status,
                limit: Some(limit),
                offset: Some(offset),
            };
            let page = orders.list(&query).await?;
            if ctx.json() {
                return ctx.print_json(&page);
            }
            for order in &page.orders {
                println!(
                    "#{:<5} {:<28} {:<18} {:>12} {}",
                    order.id.as_i64(),
                    order.order_number,
                    order.status,
                    Price::new(order.total_amount, currency).display(),
                    order.customer.name
                );
            }
            println!("{} of {} orders", page.orders.len(), page.total);
        }
        OrderCommand::Show { id } => {
            let order = orders.get(OrderId::new(id)).await?;
            if ctx.json() {
                return ctx.print_json(&order);
            }
            print_order(&order, ctx);
        }
        OrderCommand::Status { id, status } => {
            let order = orders.update_status(OrderId::new(id), status).await?;
            if ctx.json() {
                return ctx.print_json(&order);
            }
            println!("Order {} is now {}", order.order_number, order.status);
        }
        OrderCommand::Delete { id } => {
            let ack = orders.delete(OrderId::new(id)).await?;
            println!("{}", ack.message);
        }
        OrderCommand::Stats => {
            let stats = orders.stats().await?;
            if ctx.json() {
                return ctx.print_json(&stats);
            }
            for status in OrderStatus::ALL {
                println!("{:<18} {}", status.as_str(), stats.count(*status));
            }
            println!("{:<18} {}", "total", stats.total);
            println!(
                "{:<18} {}",
                "revenue",
                Price::new(stats.total_revenue, currency).display()
            );
        }
    }
    Ok(())
}

/// Run a payment command.
pub async fn run_payment(ctx: &Context, action: PaymentCommand) -> Result<(), CliError> {
    let payment = ctx.api.payment();

    match action {
        PaymentCommand::Status { payment_id } => {
            let state = payment.status(&payment_id).await?;
            if ctx.json() {
                return ctx.print_json(&state);
            }
            let status = state
                .status
                .map_or_else(|| "unknown".to_string(), |s| s.to_string());
            println!(
                "Payment {payment_id}: {status}{}",
                if state.paid { " (paid)" } else { "" }
            );
        }
        PaymentCommand::Refund { payment_id, amount } => {
            let refund = payment.refund(&payment_id, amount).await?;
            if ctx.json() {
                return ctx.print_json(&refund);
            }
            println!(
                "Refund {} for payment {payment_id}: {}",
                refund.refund_id.as_deref().unwrap_or("-"),
                refund.status.as_deref().unwrap_or("requested")
            );
        }
    }
    Ok(())
}

fn print_order(order: &Order, ctx: &Context) {
    let currency = ctx.config.checkout.currency;

    println!("Order {} (#{})", order.order_number, order.id);
    println!("Status:   {}", order.status);
    println!("Payment:  {}", order.payment_method);
    if let Some(payment_id) = order.payment_id.as_deref() {
        println!("          {payment_id}");
    }
    println!(
        "Customer: {}, {}, {}",
        order.customer.name, order.customer.email, order.customer.phone
    );
    if let Some(telegram) = order.customer.telegram.as_deref() {
        println!("          telegram {telegram}");
    }
    println!(
        "Delivery: {}, {}, {}",
        order.delivery.address, order.delivery.city, order.delivery.zipcode
    );
    if let Some(comment) = order.comment.as_deref().filter(|c| !c.is_empty()) {
        println!("Comment:  {comment}");
    }
    for item in &order.items {
        println!(
            "  {} × {} = {}",
            item.product_name,
            item.quantity,
            Price::new(item.total, currency).display()
        );
    }
    println!("Subtotal: {}", Price::new(order.subtotal, currency).display());
    println!("Shipping: {}", Price::new(order.shipping_cost, currency).display());
    println!("Total:    {}", Price::new(order.total_amount, currency).display());
}
