//! Share lookup CLI command.

use clap::Args;

use crate::error::ClientError;
use crate::output;

use super::Context;

/// Arguments for the get command
#[derive(Debug, Args)]
pub struct GetArgs {
    /// 4-digit share code
    pub share_id: String,
}

/// Execute the get command
pub async fn execute(args: &GetArgs, ctx: &Context) -> Result<(), ClientError> {
    let share_id = super::parse_share_id(&args.share_id)?;
    let view = ctx.client.get_share(share_id).await?;
    output::print_share(&view, ctx.format);
    Ok(())
}
