use serde_json::{json, Value};

use crate::auth::Identity;
use crate::cli::OutputFormat;

/// Output a resolved user in the appropriate format
pub fn output_identity(
    output_format: OutputFormat,
    message: &str,
    identity: &Identity,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": true,
                "message": message,
                "data": identity,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            println!("  id:            {}", identity.id);
            println!("  email:         {}", display(identity.email.as_deref()));
            println!("  phone:         {}", display(identity.phone.as_deref()));
            println!("  role:          {}", display(identity.role.as_deref()));
            println!(
                "  last sign-in:  {}",
                identity
                    .last_sign_in_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = Value::String(code.to_string());
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

fn display(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
