use std::io::{self, BufRead};

use clap::{Args, Subcommand};
use giftbox_app::config::ClientConfig;
use zeroize::Zeroizing;

#[derive(Debug, Args)]
pub(crate) struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Sign out and forget the session
    Logout,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Account e-mail
    #[arg(long, env = "GIFTBOX_EMAIL")]
    email: String,

    /// Account password; read from stdin when omitted
    #[arg(long, env = "GIFTBOX_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub(crate) async fn run(config: &ClientConfig, command: AuthCommand) -> Result<(), String> {
    let api = super::api_client(config)?;

    match command.command {
        AuthSubcommand::Login(args) => {
            let password = match args.password {
                Some(password) => Zeroizing::new(password),
                None => read_password()?,
            };

            if password.trim().is_empty() {
                return Err("password cannot be empty".to_string());
            }

            api.login(&args.email, password)
                .await
                .map_err(|error| error.user_message("Login failed"))?;

            println!("signed in as {}", args.email);
        }
        AuthSubcommand::Logout => {
            api.logout()
                .await
                .map_err(|error| error.user_message("Logout failed"))?;

            println!("signed out");
        }
    }

    Ok(())
}

fn read_password() -> Result<Zeroizing<String>, String> {
    eprint!("password: ");

    let mut line = Zeroizing::new(String::new());

    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|error| format!("failed to read password: {error}"))?;

    Ok(Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string()))
}
