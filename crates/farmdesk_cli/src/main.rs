//! Command-line front end over `farmdesk_core`.
//!
//! # Responsibility
//! - Wire config, logging and the SQLite record store together.
//! - Print one JSON document per command on stdout.
//!
//! Usage: `farmdesk [dashboard|low-stock|finance|ping]` (default `dashboard`).

use farmdesk_core::page::finance::FinancialSummary;
use farmdesk_core::{
    init_logging, AppConfig, Clock, DashboardService, ExpenseService, HarvestService,
    InventoryService, SqliteRecordStore, SystemClock,
};
use log::error;
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let command = std::env::args().nth(1).unwrap_or_else(|| "dashboard".to_string());
    match run(&command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error command={command} error={err}");
            eprintln!("farmdesk: {}", describe(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn run(command: &str) -> Result<String, Box<dyn Error>> {
    if command == "ping" {
        return Ok(json!({
            "ping": farmdesk_core::ping(),
            "version": farmdesk_core::core_version(),
        })
        .to_string());
    }

    let config = AppConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir())?;
    std::fs::create_dir_all(&config.data_dir)?;
    let store = Arc::new(SqliteRecordStore::open(config.database_path())?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let value = match command {
        "dashboard" => {
            let data = DashboardService::new(Arc::clone(&store))
                .with_clock(Arc::clone(&clock))
                .load()?;
            serde_json::to_value(data)?
        }
        "low-stock" => {
            let items = InventoryService::new(Arc::clone(&store)).low_stock()?;
            serde_json::to_value(items)?
        }
        "finance" => {
            let expenses = ExpenseService::new(Arc::clone(&store)).list()?;
            let harvests = HarvestService::new(Arc::clone(&store)).list()?;
            let summary = FinancialSummary::compute(&expenses, &harvests, clock.today());
            serde_json::to_value(summary)?
        }
        other => return Err(format!("unknown command `{other}`").into()),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Error text followed by its source chain.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
