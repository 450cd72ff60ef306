//! Employee record and schema validation.
//!
//! # Responsibility
//! - Define the canonical employee record and its wire field names.
//! - Validate candidates coming from typed constructors or JSON documents.
//!
//! # Invariants
//! - Required fields are non-empty strings. `null` and `""` count as absent.
//! - Validation reports every failing field, never just the first one.
//! - A record is new until the store has written or loaded it; a
//!   caller-provided `id` alone does not make it persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned to an employee on first persist.
pub type EmployeeId = Uuid;

/// Named field of the employee schema.
///
/// Ordering follows declaration order, so validation errors are reported
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeField {
    /// Store-assigned identifier (`_id`). Optional on input.
    Id,
    FirstName,
    LastName,
    Department,
}

impl EmployeeField {
    /// Fields every record must carry.
    pub const REQUIRED: [EmployeeField; 3] = [
        EmployeeField::FirstName,
        EmployeeField::LastName,
        EmployeeField::Department,
    ];

    /// Returns the document key used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Department => "department",
        }
    }
}

impl Display for EmployeeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON value category, reported when a field has the wrong type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field is absent, `null` or empty.
    Missing,
    /// Field is present but is not a string.
    InvalidType { found: ValueKind },
    /// Field is a string but cannot be parsed (only `_id`).
    Malformed,
}

impl Display for FieldErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => f.write_str("is required"),
            Self::InvalidType { found } => {
                write!(f, "must be a string, found {}", found.as_str())
            }
            Self::Malformed => f.write_str("is not a valid identifier"),
        }
    }
}

/// Structured validation failure: one entry per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeValidationError {
    errors: BTreeMap<EmployeeField, FieldErrorKind>,
}

impl EmployeeValidationError {
    pub(crate) fn insert(&mut self, field: EmployeeField, kind: FieldErrorKind) {
        self.errors.insert(field, kind);
    }

    /// Returns the failure recorded for `field`, if any.
    pub fn get(&self, field: EmployeeField) -> Option<FieldErrorKind> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: EmployeeField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Failing fields in declaration order.
    pub fn fields(&self) -> Vec<EmployeeField> {
        self.errors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmployeeField, FieldErrorKind)> + '_ {
        self.errors.iter().map(|(field, kind)| (*field, *kind))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("employee validation failed:")?;
        for (index, (field, kind)) in self.errors.iter().enumerate() {
            let separator = if index == 0 { " " } else { ", " };
            write!(f, "{separator}`{field}` {kind}")?;
        }
        Ok(())
    }
}

impl Error for EmployeeValidationError {}

/// Canonical employee record.
///
/// Deserialization goes through [`Employee::from_document`], so a decoded
/// record has always passed schema validation. Equality compares the record
/// data and ignores whether it has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct Employee {
    /// Assigned by the store on first insert unless provided by the caller.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    /// Set only by the repository after a write or load.
    #[serde(skip)]
    persisted: bool,
}

impl Employee {
    /// Creates a new, not yet persisted record.
    ///
    /// Does not validate; call [`Employee::validate`] or let the repository
    /// reject it on write.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            persisted: false,
        }
    }

    /// Creates a record with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// - Rejects the nil UUID as a malformed `_id`.
    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Result<Self, EmployeeValidationError> {
        if id.is_nil() {
            let mut errors = EmployeeValidationError::default();
            errors.insert(EmployeeField::Id, FieldErrorKind::Malformed);
            return Err(errors);
        }
        let mut employee = Self::new(first_name, last_name, department);
        employee.id = Some(id);
        Ok(employee)
    }

    /// Builds a record from a loosely typed JSON document.
    ///
    /// Unknown keys are ignored. A non-object document has every required
    /// field missing.
    ///
    /// # Errors
    /// - Returns every failing field with `Missing`, `InvalidType` or
    ///   `Malformed`.
    pub fn from_document(document: &Value) -> Result<Self, EmployeeValidationError> {
        let empty = Map::new();
        let fields = document.as_object().unwrap_or(&empty);
        let mut errors = EmployeeValidationError::default();

        let id = match fields.get(EmployeeField::Id.as_str()) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => match Uuid::parse_str(text) {
                Ok(id) if !id.is_nil() => Some(id),
                _ => {
                    errors.insert(EmployeeField::Id, FieldErrorKind::Malformed);
                    None
                }
            },
            Some(other) => {
                errors.insert(
                    EmployeeField::Id,
                    FieldErrorKind::InvalidType {
                        found: ValueKind::of(other),
                    },
                );
                None
            }
        };

        let first_name = take_required(fields, EmployeeField::FirstName, &mut errors);
        let last_name = take_required(fields, EmployeeField::LastName, &mut errors);
        let department = take_required(fields, EmployeeField::Department, &mut errors);

        match (first_name, last_name, department) {
            (Some(first_name), Some(last_name), Some(department)) if errors.is_empty() => {
                Ok(Self {
                    id,
                    first_name,
                    last_name,
                    department,
                    persisted: false,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validates required-field invariants of a typed record.
    ///
    /// # Errors
    /// - Reports every empty required field as `Missing`.
    /// - Reports a nil `id` as `Malformed`.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        let mut errors = EmployeeValidationError::default();
        if self.id.is_some_and(|id| id.is_nil()) {
            errors.insert(EmployeeField::Id, FieldErrorKind::Malformed);
        }
        for field in EmployeeField::REQUIRED {
            if self.field(field).map_or(true, str::is_empty) {
                errors.insert(field, FieldErrorKind::Missing);
            }
        }
        errors.into_result()
    }

    /// Returns the string value of a required field.
    ///
    /// Returns `None` for `EmployeeField::Id`, which is not a string field.
    pub fn field(&self, field: EmployeeField) -> Option<&str> {
        match field {
            EmployeeField::Id => None,
            EmployeeField::FirstName => Some(self.first_name.as_str()),
            EmployeeField::LastName => Some(self.last_name.as_str()),
            EmployeeField::Department => Some(self.department.as_str()),
        }
    }

    /// Returns whether this record has not been written by or loaded from
    /// the store.
    ///
    /// Records built by `new`, `with_id` or `from_document` are new even when
    /// they carry an `id`.
    pub fn is_new(&self) -> bool {
        !self.persisted
    }

    /// Returns a copy marked as stored under `id`.
    pub(crate) fn into_persisted(mut self, id: EmployeeId) -> Self {
        self.id = Some(id);
        self.persisted = true;
        self
    }

    /// Renders the record in its persisted document shape.
    pub fn to_document(&self) -> Value {
        let mut document = Map::new();
        if let Some(id) = self.id {
            document.insert(
                EmployeeField::Id.as_str().to_string(),
                Value::String(id.to_string()),
            );
        }
        for field in EmployeeField::REQUIRED {
            if let Some(value) = self.field(field) {
                document.insert(field.as_str().to_string(), Value::String(value.to_string()));
            }
        }
        Value::Object(document)
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.department == other.department
    }
}

impl Eq for Employee {}

impl TryFrom<Value> for Employee {
    type Error = EmployeeValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_document(&value)
    }
}

/// Checks that a present JSON value is a string.
///
/// Shared by filters and patches, which decide themselves how to treat `null`.
pub(crate) fn expect_string(value: &Value) -> Result<&str, FieldErrorKind> {
    match value {
        Value::String(text) => Ok(text.as_str()),
        other => Err(FieldErrorKind::InvalidType {
            found: ValueKind::of(other),
        }),
    }
}

fn take_required(
    fields: &Map<String, Value>,
    field: EmployeeField,
    errors: &mut EmployeeValidationError,
) -> Option<String> {
    match fields.get(field.as_str()) {
        None | Some(Value::Null) => {
            errors.insert(field, FieldErrorKind::Missing);
            None
        }
        Some(value) => match expect_string(value) {
            Ok("") => {
                errors.insert(field, FieldErrorKind::Missing);
                None
            }
            Ok(text) => Some(text.to_string()),
            Err(kind) => {
                errors.insert(field, kind);
                None
            }
        },
    }
}
