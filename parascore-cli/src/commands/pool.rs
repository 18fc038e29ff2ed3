//! Pool command handlers
//!
//! Shows the calculation pool of the server.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use parascore_client::ReportClient;
use parascore_core::dto::pool::{PoolStatus, WorkerSnapshot};

use crate::config::Config;

/// Pool subcommands
#[derive(Subcommand)]
pub enum PoolCommands {
    /// Show workers and the wait queue
    Status,
}

/// Handle pool commands
pub async fn handle_pool_command(command: PoolCommands, config: &Config) -> Result<()> {
    let client = ReportClient::new(&config.server_url);

    match command {
        PoolCommands::Status => show_status(&client).await,
    }
}

async fn show_status(client: &ReportClient) -> Result<()> {
    let status = client.pool_status().await?;
    print_pool_status(&status);
    Ok(())
}

fn print_pool_status(status: &PoolStatus) {
    println!(
        "{}",
        format!(
            "{} worker(s), {} busy, {} free",
            status.workers.len(),
            status.busy_workers(),
            status.free_workers
        )
        .bold()
    );
    println!();

    for worker in &status.workers {
        print_worker_summary(worker);
    }

    if status.queued_reports.is_empty() {
        println!("{}", "Wait queue is empty.".dimmed());
    } else {
        println!(
            "{}",
            format!("{} report(s) waiting:", status.queued_reports.len()).bold()
        );
        for (idx, report_id) in status.queued_reports.iter().enumerate() {
            println!("  {:>3}. Report {}", idx + 1, report_id.to_string().cyan());
        }
    }
}

fn print_worker_summary(worker: &WorkerSnapshot) {
    let state = match worker.current_report {
        Some(report_id) => format!("report {}", report_id).yellow(),
        None => "idle".green(),
    };

    println!("  {} Worker {}", "▸".cyan(), worker.id.to_string().bold());
    println!("    Host:     {}", worker.host.dimmed());
    println!("    Running:  {}", state);
}
