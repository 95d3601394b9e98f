use std::sync::Arc;

use clap::{Parser, Subcommand};
use giftbox::cart::{CartStore, FileCartStorage};
use giftbox_app::{api::ApiClient, config::ClientConfig, orders::CheckoutService};
use rusty_money::iso::Currency;

mod admin;
mod auth;
mod cart;
mod catalog;
mod checkout;
mod consult;
mod promo;
mod track;

#[derive(Debug, Parser)]
#[command(name = "giftbox", about = "Giftbox storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and out
    Auth(auth::AuthCommand),
    /// Browse products and shipping options
    Catalog(catalog::CatalogCommand),
    /// Check promotion codes
    Promo(promo::PromoCommand),
    /// Manage the local cart
    Cart(cart::CartCommand),
    /// Place orders for cart items
    Checkout(checkout::CheckoutArgs),
    /// Follow an order by its code
    Track(track::TrackArgs),
    /// Ask the shop to get in touch
    Consult(consult::ConsultArgs),
    /// Back-office records
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let config = self.config;

        match self.command {
            Commands::Auth(command) => auth::run(&config, command).await,
            Commands::Catalog(command) => catalog::run(&config, command).await,
            Commands::Promo(command) => promo::run(&config, command).await,
            Commands::Cart(command) => cart::run(&config, command).await,
            Commands::Checkout(args) => checkout::run(&config, args).await,
            Commands::Track(args) => track::run(&config, args).await,
            Commands::Consult(args) => consult::run(&config, args).await,
            Commands::Admin(command) => admin::run(&config, command).await,
        }
    }
}

fn currency(config: &ClientConfig) -> Result<&'static Currency, String> {
    config
        .currency()
        .map_err(|error| format!("invalid configuration: {error}"))
}

fn api_client(config: &ClientConfig) -> Result<ApiClient, String> {
    let api = config
        .api()
        .map_err(|error| format!("invalid configuration: {error}"))?;

    ApiClient::new(api)
        .and_then(|client| client.with_session_file(config.session_file()))
        .map_err(|error| format!("failed to create API client: {error}"))
}

fn load_cart(config: &ClientConfig) -> Result<CartStore<FileCartStorage>, String> {
    CartStore::load(config.cart_storage()).map_err(|error| format!("failed to load cart: {error}"))
}

fn checkout_service(
    config: &ClientConfig,
    api: Arc<ApiClient>,
) -> Result<CheckoutService<FileCartStorage>, String> {
    Ok(CheckoutService::new(
        api.clone(),
        api,
        load_cart(config)?,
        currency(config)?,
    ))
}
