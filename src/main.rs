use clap::Parser;
use tracing_subscriber::EnvFilter;

use renthive_gateway::cli::{self, Cli};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up BACKEND_URL, SUPABASE_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("renthive_gateway=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
