//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the employee data access contract and its query shapes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Employee::validate()` / `EmployeePatch::validate()`
//!   before persistence.
//! - Absent records are neutral results; only `save_instance` on a vanished
//!   record reports `NotFound`.

pub mod employee_repo;
pub mod query;
