pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "renthive-gateway")]
#[command(about = "RentHive gateway - authenticated proxy in front of the RentHive backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP gateway")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "List the proxied routes and their backend targets")]
    Routes,

    #[command(about = "Validate tokens against the identity provider")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Look up identity provider users (service-role key required)")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Routes) => commands::routes::handle(output_format),
        Some(Commands::Token { cmd }) => commands::token::handle(cmd, output_format).await,
        Some(Commands::User { cmd }) => commands::user::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["renthive-gateway"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parses_subcommands_with_global_json() {
        let cli = Cli::try_parse_from(["renthive-gateway", "routes", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Routes)));
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));

        let cli = Cli::try_parse_from(["renthive-gateway", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.port, Some(8080)),
            _ => panic!("expected serve"),
        }
    }
}
