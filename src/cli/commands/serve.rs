use clap::Args;

use super::load_config;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, short, help = "Listen port (overrides PORT / RENTHIVE_PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.identity.anon_key.is_empty() {
        tracing::warn!("SUPABASE_ANON_KEY is not set; token validation will fail with 500");
    }

    let state = AppState::new(config)?;
    crate::serve(state).await
}
