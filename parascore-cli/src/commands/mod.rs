//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pool;
mod report;

pub use pool::PoolCommands;
pub use report::ReportCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Report submission and lookup
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Calculation pool inspection
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Report { command } => report::handle_report_command(command, config).await,
        Commands::Pool { command } => pool::handle_pool_command(command, config).await,
    }
}
