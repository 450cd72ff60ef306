//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record and its persisted field names.
//! - Own schema validation for typed and loosely typed candidates.
//!
//! # Invariants
//! - Every persisted record has a stable, non-nil `EmployeeId`.
//! - `firstName`, `lastName` and `department` are required strings.

pub mod employee;
