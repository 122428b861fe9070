//! File download CLI command.

use std::path::PathBuf;

use clap::Args;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::ClientError;
use crate::format::format_size;
use crate::notify::Level;
use crate::session::{DownloadSession, download_destination};

use super::Context;

/// Arguments for the download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// 4-digit share code
    pub share_id: String,

    /// Output file or directory; defaults to the shared file name
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the download command
pub async fn execute(args: &DownloadArgs, ctx: &Context) -> Result<(), ClientError> {
    let share_id = super::parse_share_id(&args.share_id)?;
    let download = ctx.client.open_download(share_id).await?;

    let destination = download_destination(args.output.as_deref(), download.file_name.as_deref());
    let mut session = DownloadSession::new(
        share_id,
        destination,
        download.content_length.unwrap_or(0),
    );

    let mut partial = session.destination().as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);
    let mut file = tokio::fs::File::create(&partial).await?;
    let mut chunks = Box::pin(download.chunks());

    let written = async {
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            if let Some(update) = session.advance(chunk.len() as u64) {
                ctx.notifier.progress("Downloading", &update);
            }
        }
        file.flush().await?;
        Ok::<(), ClientError>(())
    }
    .await;
    ctx.notifier.finish_progress();

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }
    if session.expected() > 0 && session.received() != session.expected() {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(ClientError::Parse(format!(
            "Download of share {} ended after {} of {} bytes",
            session.share_id(),
            session.received(),
            session.expected()
        )));
    }
    tokio::fs::rename(&partial, session.destination()).await?;

    tracing::debug!(
        share_id = %session.share_id(),
        bytes = session.received(),
        "Download complete"
    );
    ctx.notifier.notify(
        Level::Success,
        &format!(
            "Saved {} ({})",
            session.destination().display(),
            format_size(session.received())
        ),
    );
    Ok(())
}
