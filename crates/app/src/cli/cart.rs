use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, Subcommand};
use giftbox::{
    money,
    orders::{CategoryProductSelection, OrderData, SelectedOption},
    receipt,
};
use giftbox_app::{
    config::ClientConfig,
    orders::{AddToCart, GiftSelection, quote_order},
};
use jiff::Timestamp;
use serde_json::Value;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Price a gift and add it to the cart
    Add(AddArgs),
    /// Show the cart
    List,
    /// Remove one item
    Remove(RemoveArgs),
    /// Remove every item
    Clear,
    /// Show the item count and grand total
    Total,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Order snapshot as JSON instead of the selection flags
    #[arg(long, conflicts_with_all = ["product", "variant"])]
    order_file: Option<PathBuf>,

    /// Product id
    #[arg(long, required_unless_present = "order_file")]
    product: Option<String>,

    /// Variant id
    #[arg(long, required_unless_present = "order_file")]
    variant: Option<String>,

    /// Option as NAME=VALUE or NAME=VALUE:PRICE
    #[arg(long = "option", value_parser = parse_option)]
    options: Vec<SelectedOption>,

    /// Custom product as ID=QUANTITY
    #[arg(long = "custom", value_parser = parse_quantity)]
    custom: Vec<(String, u32)>,

    /// Category product as CATEGORY/PRODUCT or CATEGORY/PRODUCT=QUANTITY
    #[arg(long = "category-product", value_parser = parse_category_product)]
    category_products: Vec<CategoryProductSelection>,

    /// Background id
    #[arg(long = "background")]
    backgrounds: Vec<String>,

    /// Per-item customisations as JSON
    #[arg(long, value_parser = parse_json)]
    customizations: Option<Value>,

    /// Background text and photo details as JSON
    #[arg(long, value_parser = parse_json)]
    background_form: Option<Value>,

    /// Shipping option id
    #[arg(long)]
    shipping: Option<String>,

    /// Promotion code
    #[arg(long)]
    promo: Option<String>,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Cart item id
    id: String,
}

pub(crate) async fn run(config: &ClientConfig, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add(args) => add(config, args).await,
        CartSubcommand::List => {
            let cart = super::load_cart(config)?;

            receipt::write_cart(io::stdout().lock(), cart.items(), super::currency(config)?)
                .map_err(|error| format!("failed to print cart: {error}"))
        }
        CartSubcommand::Remove(args) => {
            let mut cart = super::load_cart(config)?;

            let removed = cart
                .remove_item(&args.id)
                .map_err(|error| format!("failed to update cart: {error}"))?;

            if removed {
                println!("removed {}", args.id);
                Ok(())
            } else {
                Err(format!("cart item {} not found", args.id))
            }
        }
        CartSubcommand::Clear => {
            let mut cart = super::load_cart(config)?;

            cart.clear_cart()
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("cart cleared");

            Ok(())
        }
        CartSubcommand::Total => {
            let cart = super::load_cart(config)?;
            let total = money::display(cart.total_amount(), super::currency(config)?)
                .map_err(|error| format!("failed to format total: {error}"))?;

            println!("items: {}", cart.item_count());
            println!("total: {total}");

            Ok(())
        }
    }
}

async fn add(config: &ClientConfig, args: AddArgs) -> Result<(), String> {
    let api = Arc::new(super::api_client(config)?);
    let currency = super::currency(config)?;

    let order_data = match args.order_file {
        Some(path) => read_order_file(&path)?,
        None => {
            let selection = GiftSelection {
                product_id: args.product.unwrap_or_default(),
                variant_id: args.variant.unwrap_or_default(),
                selected_options: args.options,
                custom_quantities: args.custom.into_iter().collect::<BTreeMap<_, _>>(),
                selected_category_products: args.category_products,
                selected_background_ids: args.backgrounds,
                multi_item_customizations: args.customizations,
                background_form_data: args.background_form,
            };

            quote_order(api.as_ref(), currency, selection)
                .await
                .map_err(|error| format!("failed to price gift: {error}"))?
        }
    };

    let mut service = super::checkout_service(config, api)?;

    let item = service
        .add_to_cart(
            AddToCart {
                order_data,
                shipping_id: args.shipping,
                promotion_code: args.promo,
            },
            Timestamp::now(),
        )
        .await
        .map_err(|error| error.user_message())?;

    println!("item_id: {}", item.id);

    receipt::write_breakdown(io::stdout().lock(), &item.pricing(), currency)
        .map_err(|error| format!("failed to print item: {error}"))
}

fn read_order_file(path: &Path) -> Result<OrderData, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;

    serde_json::from_str(&raw).map_err(|error| format!("invalid order in {}: {error}", path.display()))
}

fn parse_option(raw: &str) -> Result<SelectedOption, String> {
    let (name, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE[:PRICE], got {raw:?}"))?;

    let (value, price) = match rest.rsplit_once(':') {
        Some((value, price)) => (
            value,
            price
                .trim()
                .parse::<u64>()
                .map_err(|error| format!("invalid option price {price:?}: {error}"))?,
        ),
        None => (rest, 0),
    };

    if name.trim().is_empty() {
        return Err("option name cannot be empty".to_string());
    }

    Ok(SelectedOption {
        name: name.trim().to_string(),
        value: value.trim().to_string(),
        price,
    })
}

fn parse_quantity(raw: &str) -> Result<(String, u32), String> {
    let (id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QUANTITY, got {raw:?}"))?;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?;

    Ok((id.trim().to_string(), quantity))
}

fn parse_category_product(raw: &str) -> Result<CategoryProductSelection, String> {
    let (ids, quantity) = match raw.split_once('=') {
        Some((ids, quantity)) => (
            ids,
            quantity
                .trim()
                .parse::<u32>()
                .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?,
        ),
        None => (raw, 1),
    };

    let (category_id, product_id) = ids
        .split_once('/')
        .ok_or_else(|| format!("expected CATEGORY/PRODUCT[=QUANTITY], got {raw:?}"))?;

    Ok(CategoryProductSelection {
        category_id: category_id.trim().to_string(),
        product_id: product_id.trim().to_string(),
        quantity,
    })
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|error| format!("invalid JSON: {error}"))
}
