use std::io;

use clap::Args;
use giftbox_app::{
    config::ClientConfig,
    orders::{track_order, write_progress},
};

#[derive(Debug, Args)]
pub(crate) struct TrackArgs {
    /// Order code printed at checkout
    code: String,
}

pub(crate) async fn run(config: &ClientConfig, args: TrackArgs) -> Result<(), String> {
    let api = super::api_client(config)?;
    let currency = super::currency(config)?;

    let order = track_order(&api, &args.code)
        .await
        .map_err(|error| error.user_message())?;

    write_progress(io::stdout().lock(), &order, currency)
        .map_err(|error| format!("failed to print order: {error}"))
}
