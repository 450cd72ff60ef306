//! Filter and patch types for employee queries.
//!
//! # Responsibility
//! - Describe which records an operation selects (`EmployeeFilter`).
//! - Describe which fields an update assigns (`EmployeePatch`).
//! - Accept the same shapes as loosely typed JSON documents.
//!
//! # Invariants
//! - Filters are exact-match conjunctions; an empty filter selects everything.
//! - A `null` criterion can never equal a stored field, so it selects nothing.
//! - A patch never clears a required field.

use crate::model::employee::{
    expect_string, Employee, EmployeeField, EmployeeId, EmployeeValidationError, FieldErrorKind,
};
use serde_json::{Map, Value};
use uuid::Uuid;

const SET_OPERATOR: &str = "$set";

/// Exact-match selection over employee fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub id: Option<EmployeeId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    matches_nothing: bool,
}

impl EmployeeFilter {
    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: EmployeeId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn with_department(mut self, value: impl Into<String>) -> Self {
        self.department = Some(value.into());
        self
    }

    /// Filter that selects no record, whatever the store holds.
    pub fn nothing() -> Self {
        Self {
            matches_nothing: true,
            ..Self::default()
        }
    }

    pub fn matches_nothing(&self) -> bool {
        self.matches_nothing
    }

    pub fn is_empty(&self) -> bool {
        !self.matches_nothing
            && self.id.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.department.is_none()
    }

    /// Builds a filter from a JSON document such as `{"firstName": "John"}`.
    ///
    /// Unknown keys are ignored. `null` or a non-object document yields an
    /// empty filter. A criterion whose value is `null` (including `_id`)
    /// makes the filter select nothing, since stored fields are never null.
    ///
    /// # Errors
    /// - Non-string criteria are `InvalidType`; an unparsable `_id` is
    ///   `Malformed`.
    pub fn from_document(document: &Value) -> Result<Self, EmployeeValidationError> {
        let empty = Map::new();
        let fields = document.as_object().unwrap_or(&empty);
        let mut errors = EmployeeValidationError::default();
        let mut filter = Self::default();

        match fields.get(EmployeeField::Id.as_str()) {
            None => {}
            Some(Value::Null) => filter.matches_nothing = true,
            Some(value) => match expect_string(value).map(Uuid::parse_str) {
                Ok(Ok(id)) => filter.id = Some(id),
                Ok(Err(_)) => errors.insert(EmployeeField::Id, FieldErrorKind::Malformed),
                Err(kind) => errors.insert(EmployeeField::Id, kind),
            },
        }

        let slots = [
            (EmployeeField::FirstName, &mut filter.first_name),
            (EmployeeField::LastName, &mut filter.last_name),
            (EmployeeField::Department, &mut filter.department),
        ];
        let mut null_criterion = false;
        for (field, slot) in slots {
            match fields.get(field.as_str()) {
                None => {}
                Some(Value::Null) => null_criterion = true,
                Some(value) => match expect_string(value) {
                    Ok(text) => *slot = Some(text.to_string()),
                    Err(kind) => errors.insert(field, kind),
                },
            }
        }
        filter.matches_nothing |= null_criterion;

        errors.into_result().map(|()| filter)
    }

    /// Returns whether `employee` satisfies every criterion.
    pub fn matches(&self, employee: &Employee) -> bool {
        if self.matches_nothing || (self.id.is_some() && self.id != employee.id) {
            return false;
        }
        EmployeeField::REQUIRED.into_iter().all(|field| {
            match (self.criterion(field), employee.field(field)) {
                (Some(expected), Some(actual)) => expected == actual,
                (Some(_), None) => false,
                (None, _) => true,
            }
        })
    }

    /// Returns the string criterion for a required field.
    pub(crate) fn criterion(&self, field: EmployeeField) -> Option<&str> {
        match field {
            EmployeeField::Id => None,
            EmployeeField::FirstName => self.first_name.as_deref(),
            EmployeeField::LastName => self.last_name.as_deref(),
            EmployeeField::Department => self.department.as_deref(),
        }
    }
}

/// Partial set of field assignments applied to matched records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
}

impl EmployeePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn set_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn set_department(mut self, value: impl Into<String>) -> Self {
        self.department = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().next().is_none()
    }

    /// Builds a patch from `{"$set": {...}}`, plain field assignments, or both.
    ///
    /// Plain fields next to `$set` are merged into it; `$set` wins when both
    /// assign the same field. Unknown keys and other operators are ignored. A
    /// `$set` value that is not an object assigns nothing.
    ///
    /// # Errors
    /// - Assigning `null` or `""` to a required field is `Missing`.
    /// - Assigning a non-string value is `InvalidType`.
    pub fn from_document(document: &Value) -> Result<Self, EmployeeValidationError> {
        let plain = document.as_object();
        let set = plain
            .and_then(|fields| fields.get(SET_OPERATOR))
            .and_then(Value::as_object);
        let mut errors = EmployeeValidationError::default();
        let mut patch = Self::default();

        let slots = [
            (EmployeeField::FirstName, &mut patch.first_name),
            (EmployeeField::LastName, &mut patch.last_name),
            (EmployeeField::Department, &mut patch.department),
        ];
        for (field, slot) in slots {
            let key = field.as_str();
            let Some(value) = set
                .and_then(|fields| fields.get(key))
                .or_else(|| plain.and_then(|fields| fields.get(key)))
            else {
                continue;
            };
            match value {
                Value::Null => errors.insert(field, FieldErrorKind::Missing),
                other => match expect_string(other) {
                    Ok("") => errors.insert(field, FieldErrorKind::Missing),
                    Ok(text) => *slot = Some(text.to_string()),
                    Err(kind) => errors.insert(field, kind),
                },
            }
        }

        errors.into_result().map(|()| patch)
    }

    /// Checks that no assignment would leave a required field empty.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        let mut errors = EmployeeValidationError::default();
        for (field, value) in self.assignments() {
            if value.is_empty() {
                errors.insert(field, FieldErrorKind::Missing);
            }
        }
        errors.into_result()
    }

    /// Applies the assignments to an in-memory record.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(value) = &self.first_name {
            employee.first_name.clone_from(value);
        }
        if let Some(value) = &self.last_name {
            employee.last_name.clone_from(value);
        }
        if let Some(value) = &self.department {
            employee.department.clone_from(value);
        }
    }

    /// Assigned fields in declaration order.
    pub fn assignments(&self) -> impl Iterator<Item = (EmployeeField, &str)> + '_ {
        [
            (EmployeeField::FirstName, self.first_name.as_deref()),
            (EmployeeField::LastName, self.last_name.as_deref()),
            (EmployeeField::Department, self.department.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeFilter, EmployeePatch};
    use crate::model::employee::{Employee, EmployeeField, FieldErrorKind, ValueKind};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = EmployeeFilter::from_document(&json!({})).unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&Employee::new("John", "Doe", "Marketing")));
    }

    #[test]
    fn filter_from_document_ignores_unknown_keys() {
        let filter =
            EmployeeFilter::from_document(&json!({ "department": "Testing", "age": 40 })).unwrap();
        assert_eq!(filter, EmployeeFilter::all().with_department("Testing"));
    }

    #[test]
    fn filter_from_document_rejects_non_string_criteria() {
        let err = EmployeeFilter::from_document(&json!({ "firstName": [], "_id": "nope" }))
            .unwrap_err();
        assert_eq!(
            err.get(EmployeeField::FirstName),
            Some(FieldErrorKind::InvalidType {
                found: ValueKind::Array
            })
        );
        assert_eq!(err.get(EmployeeField::Id), Some(FieldErrorKind::Malformed));
    }

    #[test]
    fn filter_matches_on_all_criteria() {
        let id = Uuid::new_v4();
        let mut employee = Employee::new("Jane", "Doe", "Testing");
        employee.id = Some(id);

        assert!(EmployeeFilter::by_id(id).with_last_name("Doe").matches(&employee));
        assert!(!EmployeeFilter::all()
            .with_first_name("Jane")
            .with_department("Marketing")
            .matches(&employee));
        assert!(!EmployeeFilter::by_id(Uuid::new_v4()).matches(&employee));
    }

    #[test]
    fn patch_accepts_set_wrapper_and_plain_fields() {
        let wrapped =
            EmployeePatch::from_document(&json!({ "$set": { "department": "Management" } }))
                .unwrap();
        let plain = EmployeePatch::from_document(&json!({ "department": "Management" })).unwrap();

        assert_eq!(wrapped, EmployeePatch::new().set_department("Management"));
        assert_eq!(wrapped, plain);
    }

    #[test]
    fn patch_merges_plain_fields_next_to_set() {
        let patch = EmployeePatch::from_document(&json!({
            "$set": { "department": "X" },
            "firstName": "Y"
        }))
        .unwrap();
        assert_eq!(
            patch,
            EmployeePatch::new().set_first_name("Y").set_department("X")
        );

        let patch = EmployeePatch::from_document(&json!({
            "$set": { "department": "X" },
            "department": "Z",
            "$unset": { "lastName": "" }
        }))
        .unwrap();
        assert_eq!(patch, EmployeePatch::new().set_department("X"));

        let err = EmployeePatch::from_document(&json!({
            "$set": { "department": "X" },
            "lastName": 7
        }))
        .unwrap_err();
        assert_eq!(err.fields(), vec![EmployeeField::LastName]);
    }

    #[test]
    fn null_criterion_selects_nothing() {
        let filter = EmployeeFilter::from_document(&json!({ "firstName": null })).unwrap();
        assert!(filter.matches_nothing());
        assert!(!filter.is_empty());
        assert!(!filter.matches(&Employee::new("John", "Doe", "Marketing")));

        let filter = EmployeeFilter::from_document(&json!({ "_id": null })).unwrap();
        assert_eq!(filter, EmployeeFilter::nothing());
        assert!(!EmployeeFilter::all().matches_nothing());
    }

    #[test]
    fn patch_rejects_clearing_or_retyping_required_fields() {
        let err = EmployeePatch::from_document(&json!({
            "$set": { "firstName": null, "lastName": "", "department": {} }
        }))
        .unwrap_err();

        assert_eq!(err.get(EmployeeField::FirstName), Some(FieldErrorKind::Missing));
        assert_eq!(err.get(EmployeeField::LastName), Some(FieldErrorKind::Missing));
        assert_eq!(
            err.get(EmployeeField::Department),
            Some(FieldErrorKind::InvalidType {
                found: ValueKind::Object
            })
        );
    }

    #[test]
    fn patch_validate_and_apply() {
        let mut employee = Employee::new("John", "Doe", "Marketing");
        let patch = EmployeePatch::new().set_department("Management");
        patch.validate().unwrap();
        patch.apply_to(&mut employee);
        assert_eq!(employee.department, "Management");
        assert_eq!(employee.first_name, "John");

        let err = EmployeePatch::new().set_last_name("").validate().unwrap_err();
        assert_eq!(err.fields(), vec![EmployeeField::LastName]);
        assert!(EmployeePatch::new().is_empty());
    }
}
