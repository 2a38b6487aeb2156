use clap::Subcommand;

use super::load_config;
use crate::auth::{SupabaseAuth, TokenValidator, ValidationError};
use crate::cli::utils::{output_error, output_identity};
use crate::cli::OutputFormat;
use crate::state::http_client;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Validate an access token and show the user it belongs to")]
    Check {
        #[arg(help = "Access token, without the `Bearer ` prefix")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Check { token } => {
            let config = load_config()?;
            let validator = SupabaseAuth::new(http_client()?, &config.identity);

            match validator.validate(token.trim()).await {
                Ok(identity) => output_identity(output_format, "Token is valid", &identity),
                Err(e) => {
                    output_error(output_format, &e.to_string(), Some(outcome(&e)))?;
                    anyhow::bail!("token check failed: {}", outcome(&e))
                }
            }
        }
    }
}

/// Short machine-readable outcome for a failed check.
fn outcome(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::EmptyToken | ValidationError::Rejected(_) => "rejected",
        ValidationError::Unavailable(_) | ValidationError::Unreachable(_) => "unavailable",
        ValidationError::Malformed(_) => "malformed",
        ValidationError::Misconfigured(_) => "misconfigured",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn outcomes_separate_bad_tokens_from_provider_faults() {
        assert_eq!(outcome(&ValidationError::EmptyToken), "rejected");
        assert_eq!(outcome(&ValidationError::Rejected(StatusCode::UNAUTHORIZED)), "rejected");
        assert_eq!(
            outcome(&ValidationError::Unavailable(StatusCode::BAD_GATEWAY)),
            "unavailable"
        );
        assert_eq!(outcome(&ValidationError::Misconfigured("no key")), "misconfigured");
    }
}
