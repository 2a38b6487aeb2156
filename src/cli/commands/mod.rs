pub mod routes;
pub mod serve;
pub mod token;
pub mod user;

use crate::config::AppConfig;

/// Environment-derived configuration shared by every subcommand.
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    Ok(AppConfig::from_env()?)
}
