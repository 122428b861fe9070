//! CLI command definitions and dispatch.

pub mod delete;
pub mod download;
pub mod get;
pub mod health;
pub mod text;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use quickshare_core::types::ShareId;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::model::ShareCreated;
use crate::notify::{Notifier, TerminalNotifier};
use crate::output::OutputFormat;

/// QuickShare: share files and text with a 4-digit code
#[derive(Debug, Parser)]
#[command(name = "quickshare", version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the QuickShare server
    #[arg(
        short,
        long,
        env = "QUICKSHARE_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub server: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Hide transfer progress
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Share a file
    Upload(upload::UploadArgs),
    /// Share a piece of text
    Text(text::TextArgs),
    /// Show a share
    Get(get::GetArgs),
    /// Download a shared file
    Download(download::DownloadArgs),
    /// Delete a password-protected share
    Delete(delete::DeleteArgs),
    /// Check server health
    Health,
}

/// Everything a command needs, built once at startup.
pub struct Context {
    /// API client bound to the server
    pub client: ApiClient,
    /// Where messages and progress go
    pub notifier: Arc<dyn Notifier>,
    /// Output format for results
    pub format: OutputFormat,
    /// Server base URL, without a trailing slash
    pub server: String,
}

impl Context {
    /// Absolute link to a created share's view page.
    pub fn share_link(&self, created: &ShareCreated) -> String {
        if created.url.starts_with('/') {
            format!("{}{}", self.server, created.url)
        } else {
            created.url.clone()
        }
    }
}

impl Cli {
    /// Build the command context from global flags
    pub fn context(&self) -> Result<Context, ClientError> {
        Ok(Context {
            client: ApiClient::new(&self.server)?,
            notifier: Arc::new(TerminalNotifier::new(
                self.quiet || self.format == OutputFormat::Json,
            )),
            format: self.format,
            server: self.server.trim_end_matches('/').to_string(),
        })
    }

    /// Execute the CLI command
    pub async fn execute(&self, ctx: &Context) -> Result<(), ClientError> {
        match &self.command {
            Commands::Upload(args) => upload::execute(args, ctx).await,
            Commands::Text(args) => text::execute(args, ctx).await,
            Commands::Get(args) => get::execute(args, ctx).await,
            Commands::Download(args) => download::execute(args, ctx).await,
            Commands::Delete(args) => delete::execute(args, ctx).await,
            Commands::Health => health::execute(ctx).await,
        }
    }
}

/// Helper: parse a share code typed by the user
pub fn parse_share_id(raw: &str) -> Result<ShareId, ClientError> {
    Ok(raw.trim().parse::<ShareId>()?)
}

/// Helper: resolve the password to attach to a new share
pub fn new_share_password(
    password: &Option<String>,
    ask: bool,
) -> Result<Option<String>, ClientError> {
    if let Some(password) = password {
        return Ok(Some(password.clone()));
    }
    if !ask {
        return Ok(None);
    }
    let password = dialoguer::Password::new()
        .with_prompt("Share password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    Ok(Some(password))
}

/// Helper: report a created share
pub fn report_created(ctx: &Context, created: &ShareCreated) {
    match ctx.format {
        OutputFormat::Json => crate::output::print_json(created),
        OutputFormat::Table => {
            ctx.notifier.notify(
                crate::notify::Level::Success,
                &format!("Share created: {}", created.share_id),
            );
            crate::output::print_kv("Share code", &created.share_id.to_string());
            crate::output::print_kv("Link", &ctx.share_link(created));
            crate::output::print_kv(
                "Expires in",
                &crate::format::format_eta(created.expires_in as f64),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_share_id() {
        assert_eq!(parse_share_id(" 0042 ").unwrap().to_string(), "0042");
        assert!(matches!(
            parse_share_id("42"),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "quickshare",
            "get",
            "0042",
            "--server",
            "http://share.local:9000",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://share.local:9000");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Get(_)));
    }
}
