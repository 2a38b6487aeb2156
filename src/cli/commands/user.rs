use clap::Subcommand;
use uuid::Uuid;

use super::load_config;
use crate::auth::SupabaseAuth;
use crate::cli::utils::{output_error, output_identity};
use crate::cli::OutputFormat;
use crate::state::http_client;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Show a user by id through the identity provider admin API")]
    Show {
        #[arg(help = "User id (UUID)")]
        id: Uuid,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Show { id } => {
            let config = load_config()?;
            let auth = SupabaseAuth::new(http_client()?, &config.identity);

            match auth.admin_user(id).await {
                Ok(identity) => output_identity(output_format, "User found", &identity),
                Err(e) => {
                    output_error(output_format, &e.to_string(), None)?;
                    anyhow::bail!("user lookup failed for {}", id)
                }
            }
        }
    }
}
