//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `employee_core` linkage and configuration from the shell.
//! - Print the dashboard figures of the configured store.

use employee_core::{init_logging, open_repository, CoreConfig, EmployeeService};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("employee_core ping={}", employee_core::ping());
    println!("employee_core version={}", employee_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let repo = open_repository(&config.store).map_err(|err| err.to_string())?;
    let service = EmployeeService::new(repo);
    let summary = service.dashboard().map_err(|err| err.to_string())?;

    log::info!(
        "event=cli_summary module=cli status=ok store={}",
        config.store.kind.as_str()
    );
    println!("store={}", config.store.kind.as_str());
    println!("employees={}", summary.count);
    println!("salary_average={:.2}", summary.salary_average);
    println!("max_salary={:.2}", summary.max_salary);
    println!("hr_employees={}", summary.hr_count);
    Ok(())
}
