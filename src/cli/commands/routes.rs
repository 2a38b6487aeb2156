use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::proxy::{Target, ROUTES};

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let routes: Vec<Value> = ROUTES.iter().map(|route| route.summary()).collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "routes": routes }))?);
        }
        OutputFormat::Text => {
            for route in ROUTES {
                let target = match route.target {
                    Target::Path(template) => template.to_string(),
                    Target::FirstOf(candidates) => candidates
                        .iter()
                        .map(|(key, template)| format!("{} (when {})", template, key))
                        .collect::<Vec<_>>()
                        .join(" | "),
                };
                println!(
                    "{:<7} {:<45} -> {} {}",
                    route.method.as_str(),
                    route.path,
                    route.backend.env_key(),
                    target
                );
            }
        }
    }
    Ok(())
}
