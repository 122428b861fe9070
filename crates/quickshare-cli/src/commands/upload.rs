//! File upload CLI command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::error::ClientError;
use crate::format::format_size;
use crate::notify::Level;
use crate::session::{MAX_FILE_BYTES, UploadSession};

use super::Context;

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the file to upload
    pub file: PathBuf,

    /// Override file name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Mark the upload as rich text
    #[arg(long)]
    pub rich_text: bool,

    /// Password required to delete the share
    #[arg(short, long)]
    pub password: Option<String>,

    /// Prompt for a deletion password
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, ctx: &Context) -> Result<(), ClientError> {
    let session = Arc::new(
        UploadSession::prepare(&args.file, args.name.as_deref(), MAX_FILE_BYTES).await?,
    );
    let password = super::new_share_password(&args.password, args.ask_password)?;

    ctx.notifier.notify(
        Level::Info,
        &format!(
            "Uploading '{}' ({})...",
            session.file_name(),
            format_size(session.size_bytes())
        ),
    );

    let created = ctx
        .client
        .upload_file(
            Arc::clone(&session),
            args.rich_text,
            password.as_deref(),
            Arc::clone(&ctx.notifier),
        )
        .await?;

    super::report_created(ctx, &created);
    Ok(())
}
