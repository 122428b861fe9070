//! Text sharing CLI command.

use std::path::PathBuf;

use clap::Args;
use tokio::io::AsyncReadExt;

use crate::error::ClientError;
use crate::model::TextShareRequest;
use crate::session::{MAX_TEXT_CHARS, check_text};

use super::Context;

/// Arguments for the text command
#[derive(Debug, Args)]
pub struct TextArgs {
    /// Text to share; read from stdin when omitted or `-`
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short = 'i', long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Mark the text as rich text
    #[arg(long)]
    pub rich_text: bool,

    /// Password required to delete the share
    #[arg(short, long)]
    pub password: Option<String>,

    /// Prompt for a deletion password
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,
}

async fn read_text(args: &TextArgs) -> Result<String, ClientError> {
    match (&args.text, &args.input) {
        (Some(text), _) if text != "-" => Ok(text.clone()),
        (_, Some(path)) => Ok(tokio::fs::read_to_string(path).await?),
        _ => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

/// Execute the text command
pub async fn execute(args: &TextArgs, ctx: &Context) -> Result<(), ClientError> {
    let text = read_text(args).await?;
    check_text(&text, MAX_TEXT_CHARS)?;
    let password = super::new_share_password(&args.password, args.ask_password)?;

    let created = ctx
        .client
        .share_text(&TextShareRequest {
            text_content: text,
            is_rich_text: args.rich_text,
            password,
        })
        .await?;

    super::report_created(ctx, &created);
    Ok(())
}
