//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Color a health/readiness status string
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "ready" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" | "not ready" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Color a display label by the severity of its raw weight-status class
pub fn color_category(label: &str, display: &str) -> String {
    match label {
        "Normal_Weight" => display.green().to_string(),
        "Insufficient_Weight" | "Overweight_Level_I" | "Overweight_Level_II" => {
            display.yellow().to_string()
        }
        label if label.starts_with("Obesity_Type") => display.red().to_string(),
        _ => display.to_string(),
    }
}

/// Format a unix timestamp for table output
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
