//! Employee use-case service.
//!
//! # Responsibility
//! - Expose the persistence façade over an injected repository.
//! - Translate JSON documents into validated records, filters and patches.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, RepoResult, UpdateOutcome};
use crate::repo::query::{EmployeeFilter, EmployeePatch};
use serde_json::Value;

/// Use-case service wrapper for employee CRUD operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.repo.find_all(filter)
    }

    pub fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        self.repo.find_one(filter)
    }

    pub fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.find_by_id(id)
    }

    pub fn count(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        self.repo.count(filter)
    }

    pub fn insert(&self, employee: &Employee) -> RepoResult<Employee> {
        self.repo.insert(employee)
    }

    pub fn save_instance(&self, employee: &Employee) -> RepoResult<Employee> {
        self.repo.save_instance(employee)
    }

    pub fn update_one(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        self.repo.update_one(filter, patch)
    }

    pub fn update_many(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        self.repo.update_many(filter, patch)
    }

    pub fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        self.repo.delete_one(filter)
    }

    pub fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        self.repo.delete_many(filter)
    }

    pub fn delete_instance(&self, employee: &Employee) -> RepoResult<bool> {
        self.repo.delete_instance(employee)
    }

    /// Validates a JSON document and persists it as a new record.
    ///
    /// # Contract
    /// - Every failing field is reported in one `RepoError::Validation`.
    /// - Nothing is written when validation fails.
    pub fn insert_document(&self, document: &Value) -> RepoResult<Employee> {
        let employee = Employee::from_document(document)?;
        self.repo.insert(&employee)
    }

    /// Finds records matching a JSON filter such as `{"lastName": "Doe"}`.
    pub fn find_documents(&self, filter: &Value) -> RepoResult<Vec<Employee>> {
        let filter = EmployeeFilter::from_document(filter)?;
        self.repo.find_all(&filter)
    }

    /// Returns the first record matching a JSON filter.
    pub fn find_one_document(&self, filter: &Value) -> RepoResult<Option<Employee>> {
        let filter = EmployeeFilter::from_document(filter)?;
        self.repo.find_one(&filter)
    }

    /// Applies a JSON patch (`{"$set": {...}}` or plain fields) to the first match.
    pub fn update_one_document(&self, filter: &Value, patch: &Value) -> RepoResult<UpdateOutcome> {
        let filter = EmployeeFilter::from_document(filter)?;
        let patch = EmployeePatch::from_document(patch)?;
        self.repo.update_one(&filter, &patch)
    }

    /// Applies a JSON patch to every match.
    pub fn update_many_document(
        &self,
        filter: &Value,
        patch: &Value,
    ) -> RepoResult<UpdateOutcome> {
        let filter = EmployeeFilter::from_document(filter)?;
        let patch = EmployeePatch::from_document(patch)?;
        self.repo.update_many(&filter, &patch)
    }

    /// Deletes the first record matching a JSON filter.
    pub fn delete_one_document(&self, filter: &Value) -> RepoResult<u64> {
        let filter = EmployeeFilter::from_document(filter)?;
        self.repo.delete_one(&filter)
    }

    pub fn delete_many_document(&self, filter: &Value) -> RepoResult<u64> {
        let filter = EmployeeFilter::from_document(filter)?;
        self.repo.delete_many(&filter)
    }
}
