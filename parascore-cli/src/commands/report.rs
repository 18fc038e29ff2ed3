//! Report command handlers
//!
//! Handles report submission, lookup and waiting for a result.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use parascore_client::ReportClient;
use parascore_core::domain::report::{OwnerId, ReportId, ReportStatus};
use parascore_core::dto::report::{CreateReport, ReportInfo};

use crate::config::Config;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Submit a text for paraphrase recognition
    Create {
        /// Text to score
        text: String,

        /// Owner of the report
        #[arg(long)]
        owner: OwnerId,
    },
    /// Show a report with its recognitions
    Get {
        /// Report ID
        id: ReportId,

        /// Only show the report if it belongs to this owner
        #[arg(long)]
        owner: Option<OwnerId>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Poll a report until it is completed or failed
    Wait {
        /// Report ID
        id: ReportId,

        /// Only follow the report if it belongs to this owner
        #[arg(long)]
        owner: Option<OwnerId>,

        /// Seconds between polls
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
}

/// Handle report commands
pub async fn handle_report_command(command: ReportCommands, config: &Config) -> Result<()> {
    let client = ReportClient::new(&config.server_url);

    match command {
        ReportCommands::Create { text, owner } => create_report(&client, text, owner).await,
        ReportCommands::Get { id, owner, json } => get_report(&client, id, owner, json).await,
        ReportCommands::Wait {
            id,
            owner,
            interval,
        } => wait_for_report(&client, id, owner, interval).await,
    }
}

/// Submit a new report
async fn create_report(client: &ReportClient, text: String, owner_id: OwnerId) -> Result<()> {
    let info = client
        .create_report(CreateReport { owner_id, text })
        .await
        .context("Failed to create report")?;

    println!("{}", "✓ Report submitted successfully!".green().bold());
    println!("  ID:       {}", info.id.to_string().cyan());
    println!("  Status:   {}", colorize_status(info.status));
    println!("  Queue:    {}", describe_queue_position(&info));
    println!();
    println!(
        "{}",
        format!("Follow it with: parascore report wait {}", info.id).dimmed()
    );

    Ok(())
}

/// Get and display a single report
async fn get_report(
    client: &ReportClient,
    id: ReportId,
    owner: Option<OwnerId>,
    json: bool,
) -> Result<()> {
    let info = fetch_report(client, id, owner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_report_details(&info);
    }

    Ok(())
}

/// Poll a report until it reaches a terminal status
async fn wait_for_report(
    client: &ReportClient,
    id: ReportId,
    owner: Option<OwnerId>,
    interval: u64,
) -> Result<()> {
    let interval = Duration::from_secs(interval.max(1));
    let mut last_seen = None;

    loop {
        let info = fetch_report(client, id, owner).await?;

        if info.status.is_terminal() {
            println!();
            print_report_details(&info);
            return Ok(());
        }

        let current = (info.status, info.queue_position);
        if last_seen != Some(current) {
            println!(
                "{} {}  {}",
                "▸".cyan(),
                colorize_status(info.status),
                describe_queue_position(&info).dimmed()
            );
            last_seen = Some(current);
        }

        tokio::time::sleep(interval).await;
    }
}

async fn fetch_report(
    client: &ReportClient,
    id: ReportId,
    owner: Option<OwnerId>,
) -> Result<ReportInfo> {
    client.get_report(id, owner).await.map_err(|e| {
        if e.is_not_found() {
            anyhow::anyhow!("Report {} not found", id)
        } else {
            e.into()
        }
    })
}

/// Print detailed report information
fn print_report_details(info: &ReportInfo) {
    println!("{}", "Report Details:".bold());
    println!("  ID:          {}", info.id.to_string().cyan());
    println!("  Owner:       {}", info.owner_id);
    println!("  Status:      {}", colorize_status(info.status));
    println!(
        "  Created:     {}",
        info.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if info.status == ReportStatus::Waiting {
        println!("  Queue:       {}", describe_queue_position(info));
    }

    if let Some(started) = info.calculation_started_at {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(ended) = info.calculation_ended_at {
        println!("  Ended:       {}", ended.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = info.calculation_started_at {
            let duration = ended.signed_duration_since(started);
            println!("  Duration:    {}ms", duration.num_milliseconds());
        }
    }

    if let Some(version) = &info.model_version {
        println!("  Model:       {}", version);
    }

    if !info.recognitions.is_empty() {
        println!("\n{}", "Recognitions:".bold());
        for recognition in &info.recognitions {
            let marker = if recognition.is_paraphrase {
                "✓".green()
            } else {
                "✗".red()
            };
            println!(
                "  {:>3} {} {:.3}  {}",
                recognition.sequence_number,
                marker,
                recognition.probability,
                recognition.sentence
            );
        }
    }

    if let Some(error) = &info.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

/// Human readable queue position of a report
fn describe_queue_position(info: &ReportInfo) -> String {
    match (info.status, info.queue_position) {
        (ReportStatus::Waiting, Some(position)) => format!("#{} in queue", position),
        (ReportStatus::Waiting, None) => "position unknown".to_string(),
        (ReportStatus::InProcess, _) => "being calculated".to_string(),
        _ => "finished".to_string(),
    }
}

/// Colorize report status for display
fn colorize_status(status: ReportStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        ReportStatus::Waiting => status_str.yellow(),
        ReportStatus::InProcess => status_str.cyan(),
        ReportStatus::Completed => status_str.green(),
        ReportStatus::Error => status_str.red(),
    }
}
