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

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format a whole-dollar monthly cost
pub fn format_cost(amount: u64) -> String {
    format!("${}/month", amount)
}

/// Format a storage quantity, promoting to TB when it reads better
pub fn format_storage(gb: u64) -> String {
    if gb >= 1024 && gb % 1024 == 0 {
        format!("{} TB", gb / 1024)
    } else {
        format!("{} GB", gb)
    }
}

/// Color a tier name for terminal display
pub fn color_tier(tier: &str) -> String {
    match tier {
        "economy" => tier.green().to_string(),
        "balanced" => tier.blue().to_string(),
        "performance" => tier.magenta().to_string(),
        _ => tier.to_string(),
    }
}
