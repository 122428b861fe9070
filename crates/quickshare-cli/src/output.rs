//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::format::format_size;
use crate::model::ShareView;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One labelled value in a detail table
#[derive(Debug, Serialize, Tabled)]
pub struct FieldRow {
    /// Field name
    field: &'static str,
    /// Rendered value
    value: String,
}

impl FieldRow {
    fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Detail rows describing a share, without the text body.
pub fn share_rows(view: &ShareView) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow::new("Share ID", view.share_id.to_string()),
        FieldRow::new("Kind", if view.file { "file" } else { "text" }),
    ];
    if let Some(name) = &view.file_name {
        rows.push(FieldRow::new("File name", name.as_str()));
    }
    if let Some(content_type) = &view.content_type {
        rows.push(FieldRow::new("Content type", content_type.as_str()));
    }
    if let Some(size) = view.size {
        rows.push(FieldRow::new("Size", format_size(size)));
    }
    if let Some(text_type) = view.resolved_text_type() {
        rows.push(FieldRow::new("Text type", text_type.as_str()));
    }
    if let Some(rich) = view.is_rich_text {
        rows.push(FieldRow::new("Rich text", rich.to_string()));
    }
    rows.push(FieldRow::new("Views", view.view_count.to_string()));
    rows.push(FieldRow::new(
        "Created",
        view.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ));
    rows.push(FieldRow::new(
        "Expires",
        view.expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    ));
    rows.push(FieldRow::new(
        "Password",
        if view.password_protected { "yes" } else { "no" },
    ));
    rows
}

/// Print a share in the selected format
pub fn print_share(view: &ShareView, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{}", Table::new(share_rows(view)));
            if let Some(text) = &view.text_content {
                println!();
                println!("{}", text);
            }
        }
        OutputFormat::Json => print_json(view),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{}", json);
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
