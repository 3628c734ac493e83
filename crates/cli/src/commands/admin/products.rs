//! Admin product management.

use std::path::PathBuf;

use clap::Subcommand;
use rust_decimal::Decimal;

use airshop_core::{ProductCategory, ProductId};
use airshop_storefront::api::{NewProduct, ProductQuery, ProductUpdate};

use crate::commands::{CliError, Context, invalid_input, read_json, read_text};

#[derive(Subcommand)]
pub enum ProductCommand {
    /// List every product, hidden ones included
    List,
    /// Create a product from a JSON file
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Change fields of a product
    Update {
        /// Product ID
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        old_price: Option<Decimal>,
        #[arg(long)]
        discount: Option<u32>,
        #[arg(long)]
        volume: Option<String>,
        #[arg(long)]
        category: Option<ProductCategory>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        featured: Option<bool>,
        #[arg(long)]
        new: Option<bool>,
        #[arg(long)]
        visible: Option<bool>,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: i64,
    },
    /// Create many products from a JSON array file
    Bulk {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Import products from a CSV file
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Run a product command.
pub async fn run(ctx: &Context, action: ProductCommand) -> Result<(), CliError> {
    let products = ctx.api.products();

    match action {
        ProductCommand::List => {
            let query = ProductQuery {
                visible: Some(false),
                ..ProductQuery::default()
            };
            let all = products.list(&query).await?;
            if ctx.json() {
                return ctx.print_json(&all);
            }
            for product in &all {
                println!(
                    "#{:<5} {:<16} {:<32} {:>10} {}",
                    product.id.as_i64(),
                    product.brand,
                    product.name,
                    product.price,
                    if product.is_visible { "" } else { "hidden" }
                );
            }
        }
        ProductCommand::Create { file } => {
            let product: NewProduct = read_json(&file)?;
            let created = products.create(&product).await?;
            if ctx.json() {
                return ctx.print_json(&created);
            }
            println!("Created product #{}", created.id);
        }
        ProductCommand::Update {
            id,
            name,
            brand,
            price,
            old_price,
            discount,
            volume,
            category,
            description,
            image,
            featured,
            new,
            visible,
        } => {
            let update = ProductUpdate {
                name,
                brand,
                price,
                old_price,
                discount,
                volume,
                category,
                description,
                image,
                is_featured: featured,
                is_new: new,
                is_visible: visible,
            };
            if update.is_empty() {
                return Err(invalid_input("nothing to update"));
            }
            let updated = products.update(ProductId::new(id), &update).await?;
            if ctx.json() {
                return ctx.print_json(&updated);
            }
            println!("Updated product #{}", updated.id);
        }
        ProductCommand::Delete { id } => {
            let ack = products.delete(ProductId::new(id)).await?;
            println!("{}", ack.message);
        }
        ProductCommand::Bulk { file } => {
            let batch: Vec<NewProduct> = read_json(&file)?;
            if batch.is_empty() {
                return Err(invalid_input(format!("{} holds no products", file.display())));
            }
            let created = products.bulk_create(&batch).await?;
            if ctx.json() {
                return ctx.print_json(&created);
            }
            println!("Created {} products", created.created);
        }
        ProductCommand::Import { file } => {
            let csv = read_text(&file)?;
            let report = products.import_csv(&csv).await?;
            if ctx.json() {
                return ctx.print_json(&report);
            }
            println!("Imported {} products", report.imported);
            for row in report.errors.iter().flatten() {
                println!("  row {}: {}", row.row, row.error);
            }
        }
    }
    Ok(())
}
