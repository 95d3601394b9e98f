use clap::{Args, Subcommand};
use giftbox::money;
use giftbox_app::{api::CatalogApi, config::ClientConfig};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List products
    Products,
    /// List shipping options
    ShippingFees,
}

pub(crate) async fn run(config: &ClientConfig, command: CatalogCommand) -> Result<(), String> {
    let api = super::api_client(config)?;

    match command.command {
        CatalogSubcommand::Products => {
            let products = api
                .products()
                .await
                .map_err(|error| error.user_message("Could not load products"))?;

            if products.is_empty() {
                println!("no products found");
                return Ok(());
            }

            for product in products {
                println!("product_id: {}", product.id);
                println!("name: {}", product.name);
                if let Some(description) = product.description {
                    println!("description: {description}");
                }
                println!();
            }
        }
        CatalogSubcommand::ShippingFees => {
            let currency = super::currency(config)?;
            let fees = api
                .shipping_fees()
                .await
                .map_err(|error| error.user_message("Could not load shipping options"))?;

            for fee in fees {
                let amount = money::display(fee.shipping_fee, currency)
                    .map_err(|error| format!("failed to format fee: {error}"))?;

                println!("shipping_id: {}", fee.id);
                println!("type: {}", fee.shipping_type);
                println!("area: {}", fee.area);
                println!("delivery: {}", fee.estimated_delivery_time);
                println!("fee: {amount}");
                if let Some(notes) = fee.notes_or_remarks {
                    println!("notes: {notes}");
                }
                println!();
            }
        }
    }

    Ok(())
}
