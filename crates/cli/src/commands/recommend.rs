//! Recommendation commands: submit workload descriptions and render outcomes

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;
use tabled::Tabled;

use crate::client::{ApiClient, Outcome, Recommendation, RecommendationRequest};
use crate::output::{
    color_tier, format_cost, format_storage, print_error, print_success, print_warning,
    OutputFormat,
};

/// Row for the recommendations table
#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "vCPUs")]
    cpu: String,
    #[tabled(rename = "RAM")]
    ram: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Monthly Cost")]
    cost: String,
}

/// Submit a from-scratch sizing request
pub async fn from_scratch(
    client: &ApiClient,
    users: String,
    workload: String,
    concurrency: String,
    format: OutputFormat,
) -> Result<()> {
    let request = RecommendationRequest::FromScratch {
        total_users: users,
        workload_type: workload,
        user_concurrency: concurrency,
    };

    let outcome = client.submit(&request).await?;
    render_outcome(&outcome, format)
}

/// Submit an existing-system sizing request
pub async fn existing(
    client: &ApiClient,
    cpu: String,
    ram: String,
    disk: String,
    format: OutputFormat,
) -> Result<()> {
    let request = RecommendationRequest::Existing {
        cpu,
        ram,
        hard_disk: disk,
    };

    let outcome = client.submit(&request).await?;
    render_outcome(&outcome, format)
}

/// Upload a workload data file and request sizing
pub async fn from_file(client: &ApiClient, path: &str, format: OutputFormat) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path))?;

    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();

    let request = RecommendationRequest::File {
        file_name,
        content: general_purpose::STANDARD.encode(&bytes),
    };

    let outcome = client.submit(&request).await?;
    render_outcome(&outcome, format)
}

/// Show the last stored outcome
pub async fn show_last(client: &ApiClient, format: OutputFormat) -> Result<()> {
    match client.last().await? {
        Some(outcome) => render_outcome(&outcome, format),
        None => {
            print_warning("No stored outcome");
            Ok(())
        }
    }
}

/// Clear the stored outcome
pub async fn clear(client: &ApiClient) -> Result<()> {
    client.clear().await?;
    print_success("Stored outcome cleared");
    Ok(())
}

fn render_outcome(outcome: &Outcome, format: OutputFormat) -> Result<()> {
    if matches!(format, OutputFormat::Json) {
        let json = serde_json::to_string_pretty(outcome)?;
        println!("{}", json);
        return Ok(());
    }

    match outcome {
        Outcome::Success { recommendations } => {
            render_table(recommendations);
            Ok(())
        }
        Outcome::ValidationFailed { errors } => {
            print_error("Request validation failed:");
            for err in errors {
                eprintln!("  {}: {}", err.field, err.message);
            }
            std::process::exit(1);
        }
        Outcome::ParseFailed { reason } => {
            print_error(&format!("Could not parse uploaded file: {}", reason));
            std::process::exit(1);
        }
        Outcome::InsufficientData => {
            print_error("Not enough workload data to produce a recommendation");
            std::process::exit(1);
        }
        Outcome::InternalFailure { reason } => {
            print_error(&format!("Server failure: {}", reason));
            std::process::exit(1);
        }
        Outcome::Superseded => {
            print_warning("Request superseded by a newer submission");
            Ok(())
        }
    }
}

fn render_table(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        print_warning("No recommendations returned");
        return;
    }

    let rows: Vec<TierRow> = recommendations
        .iter()
        .map(|r| TierRow {
            tier: color_tier(&r.tier),
            cpu: r.cpu_vcpus.to_string(),
            ram: format!("{} GB", r.ram_gb),
            storage: format_storage(r.storage_gb),
            network: format!("{} Gbps", r.network_gbps),
            cost: format_cost(r.estimated_monthly_cost),
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    for r in recommendations {
        println!("\n{}: {}", r.title, r.description);
    }
}
