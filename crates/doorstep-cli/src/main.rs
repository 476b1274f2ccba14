mod cli;
mod commands;
mod error;
mod prompt;
mod storage;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{auth_cmd, common, favorites_cmd, messages_cmd};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        match &error {
            CliError::Api(api_error) => {
                eprintln!("Error: {}", common::render_api_error(api_error));
            }
            other => eprintln!("Error: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut context = common::build_context(cli.api_url.as_deref(), cli.storage_path)?;

    match cli.command {
        Commands::Signup {
            full_name,
            email,
            phone,
            role,
        } => auth_cmd::run_signup(&mut context, &full_name, &email, &phone, &role).await,
        Commands::Login {
            identifier,
            password,
        } => {
            auth_cmd::run_login(
                &mut context,
                &identifier,
                password.as_deref().unwrap_or_default(),
            )
            .await
        }
        Commands::Verify { code } => auth_cmd::run_verify(&mut context, &code).await,
        Commands::Resend => auth_cmd::run_resend(&mut context).await,
        Commands::SetupPassword { password, confirm } => {
            auth_cmd::run_setup_password(&mut context, &password, confirm.as_deref()).await
        }
        Commands::Logout => auth_cmd::run_logout(&mut context).await,
        Commands::Whoami => auth_cmd::run_whoami(&mut context).await,
        Commands::Unread => messages_cmd::run_unread(&context).await,
        Commands::MarkRead { message_id } => {
            messages_cmd::run_mark_read(&context, &message_id).await
        }
        Commands::Favorite { property_id } => {
            favorites_cmd::run_favorite(&context, &property_id).await
        }
        Commands::Unfavorite { property_id } => {
            favorites_cmd::run_unfavorite(&context, &property_id).await
        }
    }
}
