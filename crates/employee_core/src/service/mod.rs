//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Accept loosely typed documents and turn them into validated requests.

pub mod employee_service;
