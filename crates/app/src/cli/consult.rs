use clap::Args;
use giftbox_app::{api::ConsultationRequest, config::ClientConfig};

#[derive(Debug, Args)]
pub(crate) struct ConsultArgs {
    /// Name to address you by
    #[arg(long)]
    name: String,

    /// Phone number to call back
    #[arg(long)]
    phone: String,

    /// E-mail address
    #[arg(long)]
    email: Option<String>,

    /// What you need help with
    #[arg(long)]
    message: String,
}

pub(crate) async fn run(config: &ClientConfig, args: ConsultArgs) -> Result<(), String> {
    if args.name.trim().is_empty() || args.phone.trim().is_empty() {
        return Err("name and phone are required".to_string());
    }

    let api = super::api_client(config)?;

    api.request_consultation(&ConsultationRequest {
        full_name: args.name,
        phone: args.phone,
        email: args.email.filter(|email| !email.trim().is_empty()),
        message: args.message,
    })
    .await
    .map_err(|error| error.user_message("Could not send request"))?;

    println!("request sent, the shop will contact you soon");

    Ok(())
}
