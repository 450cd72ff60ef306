use employee_core::{Employee, EmployeeField, FieldErrorKind, ValueKind};
use serde_json::{json, Value};
use uuid::Uuid;

#[test]
fn missing_fields_are_reported_exactly() {
    let cases = [
        (
            json!({ "firstName": "John", "lastName": "Doe" }),
            vec![EmployeeField::Department],
        ),
        (
            json!({ "firstName": "John", "department": "Marketing" }),
            vec![EmployeeField::LastName],
        ),
        (
            json!({ "lastName": "Doe", "department": "Marketing" }),
            vec![EmployeeField::FirstName],
        ),
        (json!({}), EmployeeField::REQUIRED.to_vec()),
    ];

    for (document, expected) in cases {
        let err = Employee::from_document(&document).unwrap_err();
        assert_eq!(err.fields(), expected, "document: {document}");
        for field in expected {
            assert_eq!(err.get(field), Some(FieldErrorKind::Missing));
        }
    }
}

#[test]
fn structured_values_are_rejected_for_every_string_field() {
    for field in EmployeeField::REQUIRED {
        for (value, kind) in [(json!({}), ValueKind::Object), (json!([]), ValueKind::Array)] {
            let mut document = json!({
                "firstName": "John",
                "lastName": "Doe",
                "department": "Marketing"
            });
            document[field.as_str()] = value;

            let err = Employee::from_document(&document).unwrap_err();
            assert_eq!(err.fields(), vec![field]);
            assert_eq!(err.get(field), Some(FieldErrorKind::InvalidType { found: kind }));
        }
    }
}

#[test]
fn single_wrong_field_reports_type_error_alongside_missing_ones() {
    let err = Employee::from_document(&json!({ "firstName": [] })).unwrap_err();

    assert_eq!(
        err.get(EmployeeField::FirstName),
        Some(FieldErrorKind::InvalidType {
            found: ValueKind::Array
        })
    );
    assert_eq!(err.get(EmployeeField::LastName), Some(FieldErrorKind::Missing));
    assert_eq!(err.get(EmployeeField::Department), Some(FieldErrorKind::Missing));
}

#[test]
fn numbers_and_booleans_are_not_strings() {
    let err = Employee::from_document(&json!({
        "firstName": 42,
        "lastName": true,
        "department": "Marketing"
    }))
    .unwrap_err();

    assert_eq!(
        err.get(EmployeeField::FirstName),
        Some(FieldErrorKind::InvalidType {
            found: ValueKind::Number
        })
    );
    assert_eq!(
        err.get(EmployeeField::LastName),
        Some(FieldErrorKind::InvalidType {
            found: ValueKind::Bool
        })
    );
    assert!(!err.contains(EmployeeField::Department));
}

#[test]
fn null_and_empty_strings_count_as_missing() {
    let err = Employee::from_document(&json!({
        "firstName": null,
        "lastName": "",
        "department": " "
    }))
    .unwrap_err();

    assert_eq!(
        err.fields(),
        vec![EmployeeField::FirstName, EmployeeField::LastName]
    );
}

#[test]
fn well_formed_documents_validate() {
    let cases = [
        json!({ "firstName": "John", "lastName": "Doe", "department": "Marketing" }),
        json!({ "firstName": "Jane", "lastName": "Doe", "department": "Testing", "nickname": 7 }),
    ];

    for document in cases {
        let employee = Employee::from_document(&document).unwrap();
        assert!(employee.is_new());
        employee.validate().unwrap();
    }
}

#[test]
fn non_object_document_is_missing_every_field() {
    for document in [Value::Null, json!("John Doe"), json!(["John", "Doe"])] {
        let err = Employee::from_document(&document).unwrap_err();
        assert_eq!(err.fields(), EmployeeField::REQUIRED.to_vec());
    }
}

#[test]
fn typed_validate_reports_all_empty_fields() {
    let err = Employee::new("", "Doe", "").validate().unwrap_err();
    assert_eq!(
        err.fields(),
        vec![EmployeeField::FirstName, EmployeeField::Department]
    );
    assert!(err.to_string().contains("`firstName` is required"));

    Employee::new("John", "Doe", "Marketing").validate().unwrap();
}

#[test]
fn document_id_must_be_a_uuid_string() {
    let err = Employee::from_document(&json!({
        "_id": "not-a-uuid",
        "firstName": "John",
        "lastName": "Doe",
        "department": "Marketing"
    }))
    .unwrap_err();
    assert_eq!(err.fields(), vec![EmployeeField::Id]);
    assert_eq!(err.get(EmployeeField::Id), Some(FieldErrorKind::Malformed));

    let err = Employee::from_document(&json!({
        "_id": 12,
        "firstName": "John",
        "lastName": "Doe",
        "department": "Marketing"
    }))
    .unwrap_err();
    assert_eq!(
        err.get(EmployeeField::Id),
        Some(FieldErrorKind::InvalidType {
            found: ValueKind::Number
        })
    );
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Employee::with_id(Uuid::nil(), "John", "Doe", "Marketing").unwrap_err();
    assert_eq!(err.get(EmployeeField::Id), Some(FieldErrorKind::Malformed));
}

#[test]
fn serialization_uses_document_field_names() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let employee = Employee::with_id(id, "Jane", "Doe", "Testing").unwrap();

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(
        json,
        json!({
            "_id": "11111111-2222-4333-8444-555555555555",
            "firstName": "Jane",
            "lastName": "Doe",
            "department": "Testing"
        })
    );
    assert_eq!(json, employee.to_document());

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn new_records_serialize_without_id() {
    let json = serde_json::to_value(Employee::new("John", "Doe", "Marketing")).unwrap();
    assert!(json.get("_id").is_none());
}

#[test]
fn deserialize_runs_schema_validation() {
    let err = serde_json::from_value::<Employee>(json!({
        "firstName": {},
        "lastName": "Doe"
    }))
    .unwrap_err();

    let message = err.to_string();
    assert!(
        message.contains("`firstName` must be a string, found object"),
        "unexpected error: {message}"
    );
    assert!(message.contains("`department` is required"), "unexpected error: {message}");
}
