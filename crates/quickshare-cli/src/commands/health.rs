//! Server health CLI command.

use crate::error::ClientError;
use crate::output::{self, OutputFormat};

use super::Context;

/// Execute the health command
pub async fn execute(ctx: &Context) -> Result<(), ClientError> {
    let health = ctx.client.health().await?;
    match ctx.format {
        OutputFormat::Json => output::print_json(&health),
        OutputFormat::Table => {
            output::print_kv("Status", &health.status);
            output::print_kv("Version", &health.version);
            output::print_kv("Uptime (s)", &health.uptime_seconds.to_string());
            output::print_kv("Active shares", &health.active_shares.to_string());
            if let (Some(provider), Some(storage)) = (&health.storage_provider, &health.storage) {
                output::print_kv("Storage", &format!("{provider} ({storage})"));
            }
        }
    }
    Ok(())
}
