//! Core domain logic for the employee store.
//! This crate is the single source of truth for employee record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, StoreUri};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::employee::{
    Employee, EmployeeField, EmployeeId, EmployeeValidationError, FieldErrorKind, ValueKind,
};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository, UpdateOutcome,
};
pub use repo::query::{EmployeeFilter, EmployeePatch};
pub use service::employee_service::EmployeeService;

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
