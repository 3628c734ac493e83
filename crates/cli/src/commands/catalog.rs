//! Catalog browsing commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use airshop_core::{Price, ProductCategory, ProductId};
use airshop_storefront::api::{Product, ProductQuery};
use airshop_storefront::catalog::{self, CatalogFilter, PriceRange, SortOrder};

use super::{CliError, Context};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products with filters
    List {
        /// Category (`men`, `women`, `unisex`)
        #[arg(short, long)]
        category: Option<ProductCategory>,

        /// Text search over name, brand and description
        #[arg(short, long)]
        search: Option<String>,

        /// Brand to include; repeat for several
        #[arg(short, long = "brand")]
        brands: Vec<String>,

        /// Volume to include, e.g. `100мл`; repeat for several
        #[arg(short, long = "volume")]
        volumes: Vec<String>,

        /// Lowest price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest price
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Sort order (`price-asc`, `price-desc`, `name-asc`, `new`)
        #[arg(long, default_value = "default")]
        sort: String,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Show {
        /// Product ID
        id: i64,
    },
    /// Search suggestions for a query; the query is kept in the history
    Search {
        /// Search text
        query: String,
    },
    /// Brands and volumes available in a category
    Facets {
        #[arg(short, long)]
        category: Option<ProductCategory>,
    },
    /// Show or clear recent searches
    History {
        #[arg(long)]
        clear: bool,
    },
}

/// Run a catalog command.
pub async fn run(ctx: &Context, action: CatalogAction) -> Result<(), CliError> {
    match action {
        CatalogAction::List {
            category,
            search,
            brands,
            volumes,
            min_price,
            max_price,
            sort,
            featured,
        } => {
            let query = ProductQuery {
                category,
                featured: featured.then_some(true),
                ..ProductQuery::default()
            };
            let products = ctx.api.products().list(&query).await?;

            let default_range = PriceRange::default();
            let filter = CatalogFilter {
                category,
                search,
                brands,
                price: PriceRange {
                    min: min_price.unwrap_or(default_range.min),
                    max: max_price.unwrap_or(default_range.max),
                },
                volumes,
                sort: SortOrder::parse(&sort),
            };
            let shown = filter.apply(&products);

            if ctx.json() {
                return ctx.print_json(&shown);
            }
            for product in &shown {
                print_product_line(product, ctx);
            }
            println!("{} of {} products", shown.len(), products.len());
        }
        CatalogAction::Show { id } => {
            let product = ctx.api.products().get(ProductId::new(id)).await?;
            if ctx.json() {
                return ctx.print_json(&product);
            }
            print_product_line(&product, ctx);
            if let Some(old_price) = product.old_price {
                println!(
                    "  was {} (-{}%)",
                    Price::new(old_price, ctx.config.checkout.currency).display(),
                    product.discount
                );
            }
            if let Some(description) = product.description.as_deref() {
                println!("  {description}");
            }
        }
        CatalogAction::Search { query } => {
            let products = ctx.api.products().list(&ProductQuery::default()).await?;
            ctx.history.record(&query);

            let found = catalog::suggestions(&products, &query);
            if ctx.json() {
                return ctx.print_json(&found);
            }
            if found.is_empty() {
                println!("No suggestions for \"{}\"", query.trim());
            }
            for product in found {
                print_product_line(product, ctx);
            }
        }
        CatalogAction::Facets { category } => {
            let query = ProductQuery {
                category,
                ..ProductQuery::default()
            };
            let products = ctx.api.products().list(&query).await?;
            let brands = catalog::facets(&products);
            let volumes = catalog::volumes(&products);

            if ctx.json() {
                return ctx.print_json(&serde_json::json!({
                    "popularBrands": brands.popular,
                    "otherBrands": brands.others,
                    "volumes": volumes,
                }));
            }
            println!("Popular brands: {}", brands.popular.join(", "));
            println!("Other brands:   {}", brands.others.join(", "));
            println!("Volumes:        {}", volumes.join(", "));
        }
        CatalogAction::History { clear } => {
            if clear {
                ctx.history.clear();
                return Ok(());
            }
            let entries = ctx.history.entries();
            if ctx.json() {
                return ctx.print_json(&entries);
            }
            for entry in entries {
                println!("{entry}");
            }
        }
    }
    Ok(())
}

fn print_product_line(product: &Product, ctx: &Context) {
    let mut tags = Vec::new();
    if product.is_new {
        tags.push("new");
    }
    if product.is_featured {
        tags.push("hit");
    }
    if !product.is_visible {
        tags.push("hidden");
    }

    println!(
        "#{:<5} {:<16} {:<32} {:>8} {:>12} {}",
        product.id.as_i64(),
        product.brand,
        product.name,
        product.volume,
        Price::new(product.price, ctx.config.checkout.currency).display(),
        tags.join(" ")
    );
}
