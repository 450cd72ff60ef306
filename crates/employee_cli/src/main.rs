//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `employee_core` linkage and store bootstrap from the environment.
//! - Keep output deterministic for quick local sanity checks.

use employee_core::db::connect;
use employee_core::{
    init_logging_from_config, EmployeeFilter, EmployeeRepository, SqliteEmployeeRepository,
    StoreConfig,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("employee_core ping={}", employee_core::ping());
    println!("employee_core version={}", employee_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("employee_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    init_logging_from_config(&config)?;

    let conn = connect(&config.uri)?;
    let repo = SqliteEmployeeRepository::try_new(&conn)?;
    let total = repo.count(&EmployeeFilter::all())?;

    info!(
        "event=cli_probe module=cli status=ok mode={} employees={total}",
        config.uri.mode()
    );
    println!("employee_store uri={} employees={total}", config.uri);
    Ok(())
}
