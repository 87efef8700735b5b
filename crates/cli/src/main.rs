//! Workload Sizer CLI
//!
//! A command-line tool for submitting workload descriptions to a running
//! sizer-server and rendering the tiered recommendations it returns.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::recommend;

/// Workload Sizer CLI
#[derive(Parser)]
#[command(name = "wls")]
#[command(author, version, about = "CLI for the Workload Sizer", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via WLS_API_URL env var)
    #[arg(long, env = "WLS_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request sizing recommendations
    #[command(subcommand)]
    Recommend(RecommendCommands),

    /// Show the last stored outcome
    Last,

    /// Clear the stored outcome
    Clear,
}

#[derive(Subcommand)]
pub enum RecommendCommands {
    /// Size a greenfield workload from projected usage
    FromScratch {
        /// Total expected users
        #[arg(long)]
        users: String,

        /// Type of workload (e.g. database, web-server, analytics)
        #[arg(long)]
        workload: String,

        /// Peak concurrent users
        #[arg(long)]
        concurrency: String,
    },

    /// Right-size an already-running system
    Existing {
        /// Current CPU description (e.g. "Intel i7 4.2GHz, 8 cores")
        #[arg(long)]
        cpu: String,

        /// Current RAM description (e.g. "16GB DDR4")
        #[arg(long)]
        ram: String,

        /// Current disk description (e.g. "500GB SSD")
        #[arg(long)]
        disk: String,
    },

    /// Size a fleet from an uploaded CSV/XLS/XLSX file
    File {
        /// Path to the workload data file
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Recommend(cmd) => match cmd {
            RecommendCommands::FromScratch {
                users,
                workload,
                concurrency,
            } => {
                recommend::from_scratch(&client, users, workload, concurrency, cli.format).await?;
            }
            RecommendCommands::Existing { cpu, ram, disk } => {
                recommend::existing(&client, cpu, ram, disk, cli.format).await?;
            }
            RecommendCommands::File { path } => {
                recommend::from_file(&client, &path, cli.format).await?;
            }
        },
        Commands::Last => {
            recommend::show_last(&client, cli.format).await?;
        }
        Commands::Clear => {
            recommend::clear(&client).await?;
        }
    }

    Ok(())
}
