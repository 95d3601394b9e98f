use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};
use giftbox_app::{
    api::{AdminClient, AdminResource, ListQuery},
    config::ClientConfig,
};
use serde_json::Value;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    /// Back-office resource
    #[arg(value_enum)]
    resource: AdminResource,

    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// List records
    List(ListArgs),
    /// Show one record
    Get(IdArgs),
    /// Create a record from JSON
    Create(BodyArgs),
    /// Change fields of a record
    Update(UpdateArgs),
    /// Delete a record
    Delete(IdArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// One-based page number
    #[arg(long)]
    page: Option<u32>,

    /// Page size
    #[arg(long)]
    limit: Option<u32>,

    /// Free-text filter
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct IdArgs {
    /// Record id
    id: String,
}

#[derive(Debug, Args)]
struct BodyArgs {
    /// Record as inline JSON
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    data: Option<String>,

    /// File holding the record as JSON
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Record id
    id: String,

    #[command(flatten)]
    body: BodyArgs,
}

pub(crate) async fn run(config: &ClientConfig, command: AdminCommand) -> Result<(), String> {
    let api = super::api_client(config)?;
    let resource = command.resource;
    let admin = AdminClient::new(&api, resource);
    let failed = |action: &str| format!("Could not {action} {resource}");

    let record = match command.command {
        AdminSubcommand::List(args) => admin
            .list(&ListQuery {
                page: args.page,
                limit: args.limit,
                search: args.search,
            })
            .await
            .map_err(|error| error.user_message(&failed("list")))?,
        AdminSubcommand::Get(args) => admin
            .get(&args.id)
            .await
            .map_err(|error| error.user_message(&failed("load")))?,
        AdminSubcommand::Create(args) => admin
            .create(&read_body(args)?)
            .await
            .map_err(|error| error.user_message(&failed("create")))?,
        AdminSubcommand::Update(args) => admin
            .update(&args.id, &read_body(args.body)?)
            .await
            .map_err(|error| error.user_message(&failed("update")))?,
        AdminSubcommand::Delete(args) => {
            admin
                .delete(&args.id)
                .await
                .map_err(|error| error.user_message(&failed("delete")))?;

            println!("deleted {}", args.id);
            return Ok(());
        }
    };

    let pretty = serde_json::to_string_pretty(&record)
        .map_err(|error| format!("failed to print response: {error}"))?;

    println!("{pretty}");

    Ok(())
}

fn read_body(args: BodyArgs) -> Result<Value, String> {
    let raw = match (args.data, args.file) {
        (Some(data), _) => data,
        (None, Some(path)) => fs::read_to_string(&path)
            .map_err(|error| format!("failed to read {}: {error}", path.display()))?,
        (None, None) => return Err("provide --data or --file".to_string()),
    };

    let body: Value =
        serde_json::from_str(&raw).map_err(|error| format!("invalid JSON body: {error}"))?;

    if body.is_object() {
        Ok(body)
    } else {
        Err("the JSON body must be an object".to_string())
    }
}
