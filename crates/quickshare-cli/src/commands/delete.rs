//! Share deletion CLI command.

use clap::Args;

use crate::error::ClientError;
use crate::notify::Level;
use crate::output::{self, OutputFormat};

use super::Context;

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// 4-digit share code
    pub share_id: String,

    /// Share password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Execute the delete command
pub async fn execute(args: &DeleteArgs, ctx: &Context) -> Result<(), ClientError> {
    let share_id = super::parse_share_id(&args.share_id)?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Share password")
            .interact()?,
    };

    let result = ctx.client.delete_share(share_id, &password).await?;
    match ctx.format {
        OutputFormat::Json => output::print_json(&result),
        OutputFormat::Table => ctx
            .notifier
            .notify(Level::Success, &format!("Share {} deleted", result.share_id)),
    }
    Ok(())
}
