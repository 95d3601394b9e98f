use std::sync::Arc;

use clap::{Args, Subcommand};
use giftbox::{money, pricing};
use giftbox_app::config::ClientConfig;
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct PromoCommand {
    #[command(subcommand)]
    command: PromoSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoSubcommand {
    /// Check whether a code applies to an order subtotal
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Promotion code
    code: String,

    /// Order subtotal in minor units
    #[arg(long)]
    subtotal: u64,
}

pub(crate) async fn run(config: &ClientConfig, command: PromoCommand) -> Result<(), String> {
    match command.command {
        PromoSubcommand::Check(args) => check(config, args).await,
    }
}

async fn check(config: &ClientConfig, args: CheckArgs) -> Result<(), String> {
    let api = Arc::new(super::api_client(config)?);
    let service = super::checkout_service(config, api)?;
    let currency = super::currency(config)?;

    let promotion = service
        .check_promotion(&args.code, args.subtotal, Timestamp::now())
        .await
        .map_err(|error| error.user_message())?;

    let breakdown = pricing::price_breakdown(currency, args.subtotal, 0, 0, Some(&promotion))
        .map_err(|error| format!("failed to price order: {error}"))?;

    let format = |amount| {
        money::display(amount, currency).map_err(|error| format!("failed to format amount: {error}"))
    };

    println!("code: {}", promotion.code);
    if let Some(name) = &promotion.name {
        println!("name: {name}");
    }
    println!("discount: {}", format(breakdown.discount)?);
    println!("subtotal_after_discount: {}", format(breakdown.total)?);

    Ok(())
}
