//! Admin site settings.

use std::path::PathBuf;

use clap::Subcommand;

use airshop_storefront::api::{ContactUpdate, HeroUpdate, SiteSettings};

use crate::commands::{CliError, Context, invalid_input, read_json};

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show every setting
    Show,
    /// Change the home page banner
    Hero {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
    },
    /// Change contact channels
    Contact {
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        telegram: Option<String>,
    },
    /// Restore default settings
    Reset,
    /// Replace every setting from a JSON file
    Set {
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Run a settings command.
pub async fn run(ctx: &Context, action: SettingsCommand) -> Result<(), CliError> {
    let api = ctx.api.settings();

    let settings = match action {
        SettingsCommand::Show => api.get().await?,
        SettingsCommand::Hero { title, subtitle } => {
            if title.is_none() && subtitle.is_none() {
                return Err(invalid_input("give --title or --subtitle"));
            }
            let hero = api.update_hero(&HeroUpdate { title, subtitle }).await?;
            return if ctx.json() {
                ctx.print_json(&hero)
            } else {
                println!("Hero: {} / {}", hero.title, hero.subtitle);
                Ok(())
            };
        }
        SettingsCommand::Contact {
            phone,
            email,
            telegram,
        } => {
            let update = ContactUpdate {
                phone,
                email,
                telegram,
            };
            if update == ContactUpdate::default() {
                return Err(invalid_input("give --phone, --email or --telegram"));
            }
            let contact = api.update_contact(&update).await?;
            return if ctx.json() {
                ctx.print_json(&contact)
            } else {
                println!(
                    "Contact: {}, {}, {}",
                    contact.phone, contact.email, contact.telegram
                );
                Ok(())
            };
        }
        SettingsCommand::Reset => api.reset().await?,
        SettingsCommand::Set { file } => {
            let settings: SiteSettings = read_json(&file)?;
            api.update(&settings).await?
        }
    };

    if ctx.json() {
        return ctx.print_json(&settings);
    }
    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &SiteSettings) {
    println!("Hero:     {}", settings.hero.title);
    println!("          {}", settings.hero.subtitle);
    println!(
        "Contact:  {}, {}, {}",
        settings.contact.phone, settings.contact.email, settings.contact.telegram
    );
    println!(
        "Shipping: {} below {}",
        settings.shipping.standard_shipping_cost, settings.shipping.free_shipping_threshold
    );
    println!(
        "Business: {}, {}, {}",
        settings.business.company_name, settings.business.address, settings.business.working_hours
    );
}
