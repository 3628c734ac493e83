//! Admin commands.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from AIRSHOP_ADMIN_PASSWORD or --password)
//! airshop admin login -u admin
//!
//! # Who am I, and is the token still valid?
//! airshop admin whoami
//!
//! # Catalog, orders, settings, payments
//! airshop admin products import --file catalog.csv
//! airshop admin orders status 42 shipping
//! airshop admin settings hero --title "Весенняя коллекция"
//! airshop admin payment refund 2c4f... --amount 1500
//! ```
//!
//! Everything except `login` needs a stored token.

mod orders;
mod products;
mod settings;

use clap::Subcommand;
use secrecy::SecretString;

use super::{CliError, Context};

pub use orders::{OrderCommand, PaymentCommand};
pub use products::ProductCommand;
pub use settings::SettingsCommand;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Log in and store the token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "AIRSHOP_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Verify the stored token and show the admin profile
    Whoami,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductCommand,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderCommand,
    },
    /// Manage site settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Inspect and refund gateway payments
    Payment {
        #[command(subcommand)]
        action: PaymentCommand,
    },
}

/// Run an admin command.
pub async fn run(ctx: &Context, action: AdminAction) -> Result<(), CliError> {
    match action {
        AdminAction::Login { username, password } => {
            let password = SecretString::from(password);
            let user = ctx.api.auth().login(&username, &password).await?;
            if ctx.json() {
                return ctx.print_json(&user);
            }
            println!("Logged in as {} ({})", user.username, user.role);
            Ok(())
        }
        AdminAction::Logout => {
            ctx.api.auth().logout()?;
            println!("Logged out");
            Ok(())
        }
        AdminAction::Whoami => {
            ctx.require_admin()?;
            let user = ctx.api.auth().verify().await?;
            if ctx.json() {
                return ctx.print_json(&user);
            }
            println!("{} ({})", user.username, user.role);
            if let Some(email) = user.email.as_deref() {
                println!("Email: {email}");
            }
            if let Some(last_login) = user.last_login {
                println!("Last login: {}", last_login.format("%d.%m.%Y %H:%M"));
            }
            Ok(())
        }
        AdminAction::Products { action } => {
            ctx.require_admin()?;
            products::run(ctx, action).await
        }
        AdminAction::Orders { action } => {
            ctx.require_admin()?;
            orders::run(ctx, action).await
        }
        AdminAction::Settings { action } => {
            ctx.require_admin()?;
            settings::run(ctx, action).await
        }
        AdminAction::Payment { action } => {
            ctx.require_admin()?;
            orders::run_payment(ctx, action).await
        }
    }
}
