use std::sync::Arc;

use clap::Args;
use giftbox::orders::CustomerInfo;
use giftbox_app::{config::ClientConfig, orders::BatchCheckout};
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Cart item to order
    #[arg(required_unless_present_any = ["all", "items"], conflicts_with_all = ["all", "items"])]
    item_id: Option<String>,

    /// Order the whole cart as one batch
    #[arg(long, conflicts_with = "items")]
    all: bool,

    /// Order these cart items as one batch
    #[arg(long = "item")]
    items: Vec<String>,

    /// Batch shipping option id
    #[arg(long, conflicts_with = "item_id")]
    shipping: Option<String>,

    /// Batch promotion code, applied to the sum of the items
    #[arg(long, conflicts_with = "item_id")]
    promo: Option<String>,

    #[command(flatten)]
    customer: CustomerArgs,
}

#[derive(Debug, Args)]
struct CustomerArgs {
    /// Recipient full name
    #[arg(long, env = "GIFTBOX_CUSTOMER_NAME")]
    name: String,

    /// Contact phone number
    #[arg(long, env = "GIFTBOX_CUSTOMER_PHONE")]
    phone: String,

    /// Contact e-mail
    #[arg(long, env = "GIFTBOX_CUSTOMER_EMAIL")]
    email: Option<String>,

    /// Delivery address
    #[arg(long, env = "GIFTBOX_CUSTOMER_ADDRESS")]
    address: String,

    /// Note for the shop
    #[arg(long)]
    note: Option<String>,
}

impl From<CustomerArgs> for CustomerInfo {
    fn from(args: CustomerArgs) -> Self {
        Self {
            full_name: args.name,
            phone: args.phone,
            email: args.email,
            address: args.address,
            note: args.note,
        }
    }
}

pub(crate) async fn run(config: &ClientConfig, args: CheckoutArgs) -> Result<(), String> {
    let api = Arc::new(super::api_client(config)?);
    let mut service = super::checkout_service(config, api)?;

    match args.item_id {
        Some(item_id) => {
            let receipt = service
                .checkout_item(&item_id, args.customer.into(), Timestamp::now())
                .await
                .map_err(|error| error.user_message())?;

            println!("order_code: {}", receipt.order_code);
            if let Some(status) = receipt.status {
                println!("status: {status}");
            }
        }
        None => {
            let receipt = service
                .checkout_batch(
                    BatchCheckout {
                        customer_info: args.customer.into(),
                        shipping_id: args.shipping,
                        promotion_code: args.promo,
                        item_ids: if args.all { Vec::new() } else { args.items },
                    },
                    Timestamp::now(),
                )
                .await
                .map_err(|error| error.user_message())?;

            if let Some(batch_code) = receipt.batch_code {
                println!("batch_code: {batch_code}");
            }
            for order in receipt.orders {
                println!("order_code: {}", order.order_code);
            }
        }
    }

    Ok(())
}
