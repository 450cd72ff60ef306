//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide filter-based find/update/delete and per-record save over the
//!   `employees` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records and patches before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - "Nothing matched" is a neutral result (`None`, `0`, `false`), not an error.
//! - Results come back in insertion order (`rowid ASC`).

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeField, EmployeeId, EmployeeValidationError};
use crate::repo::query::{EmployeeFilter, EmployeePatch};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EMPLOYEES_TABLE: &str = "employees";
const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "department",
    "created_at",
    "updated_at",
];

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    department
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record or patch failed schema validation; nothing was written.
    Validation(EmployeeValidationError),
    /// Storage error, propagated unchanged.
    Db(DbError),
    /// A previously persisted record no longer exists.
    NotFound(EmployeeId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "employee repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "employee repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Counts reported by bulk and single updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Records selected by the filter.
    pub matched: u64,
    /// Records whose stored values actually changed.
    pub modified: u64,
}

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    /// Returns every record matching `filter`; an empty filter matches all.
    fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>;
    /// Returns the first matching record.
    fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn count(&self, filter: &EmployeeFilter) -> RepoResult<u64>;
    /// Persists a new record and returns it with its identifier set.
    fn insert(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Inserts when new, otherwise overwrites the stored fields.
    fn save_instance(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Patches the first matching record.
    fn update_one(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome>;
    fn update_many(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome>;
    /// Deletes the first matching record. Returns the number removed.
    fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<u64>;
    fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<u64>;
    /// Deletes the stored copy of `employee`. `false` when nothing was removed.
    fn delete_instance(&self, employee: &Employee) -> RepoResult<bool>;
}

/// SQLite-backed employee repository.
///
/// Borrows an already migrated connection; the caller owns its lifetime.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema does
    ///   not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn first_matching_id(&self, filter: &EmployeeFilter) -> RepoResult<Option<String>> {
        let (clause, bind_values) = filter_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id FROM employees{clause} ORDER BY rowid ASC LIMIT 1"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn apply_patch(
        &self,
        selection: &str,
        selection_values: Vec<Value>,
        patch: &EmployeePatch,
    ) -> RepoResult<u64> {
        let assignments: Vec<(EmployeeField, &str)> = patch.assignments().collect();
        if assignments.is_empty() {
            return Ok(0);
        }

        let set_sql = assignments
            .iter()
            .map(|(field, _)| format!("{} = ?", column_name(*field)))
            .collect::<Vec<_>>()
            .join(", ");
        let changed_sql = assignments
            .iter()
            .map(|(field, _)| format!("{} IS NOT ?", column_name(*field)))
            .collect::<Vec<_>>()
            .join(" OR ");

        let patch_values = assignments
            .iter()
            .map(|(_, value)| Value::Text((*value).to_string()));
        let mut bind_values: Vec<Value> = patch_values.clone().collect();
        bind_values.extend(selection_values);
        bind_values.extend(patch_values);

        let changed = self.conn.execute(
            &format!(
                "UPDATE employees
                 SET {set_sql}, updated_at = (strftime('%s', 'now') * 1000)
                 {selection} AND ({changed_sql});"
            ),
            params_from_iter(bind_values),
        )?;
        Ok(changed as u64)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn find_all(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        let (clause, bind_values) = filter_clause(filter);
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL}{clause} ORDER BY rowid ASC"))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        let (clause, bind_values) = filter_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}{clause} ORDER BY rowid ASC LIMIT 1"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.find_one(&EmployeeFilter::by_id(id))
    }

    fn count(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        let (clause, bind_values) = filter_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM employees{clause};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn insert(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let id = employee.id.unwrap_or_else(Uuid::new_v4);
        self.conn.execute(
            "INSERT INTO employees (
                id,
                first_name,
                last_name,
                department
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.department.as_str(),
            ],
        )?;
        debug!("event=employee_insert module=repo status=ok id={id}");

        Ok(employee.clone().into_persisted(id))
    }

    fn save_instance(&self, employee: &Employee) -> RepoResult<Employee> {
        let id = match employee.id {
            Some(id) if !employee.is_new() => id,
            _ => return self.insert(employee),
        };
        employee.validate()?;

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2,
                department = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.department.as_str(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        debug!("event=employee_save module=repo status=ok id={id}");

        Ok(employee.clone().into_persisted(id))
    }

    fn update_one(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        patch.validate()?;

        let Some(id) = self.first_matching_id(filter)? else {
            return Ok(UpdateOutcome::default());
        };
        let modified = self.apply_patch("WHERE id = ?", vec![Value::Text(id)], patch)?;
        debug!("event=employee_update module=repo status=ok scope=one matched=1 modified={modified}");

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    fn update_many(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        patch.validate()?;

        let matched = self.count(filter)?;
        if matched == 0 {
            return Ok(UpdateOutcome::default());
        }
        let (clause, bind_values) = filter_clause(filter);
        let modified = self.apply_patch(clause.trim_start(), bind_values, patch)?;
        debug!(
            "event=employee_update module=repo status=ok scope=many matched={matched} modified={modified}"
        );

        Ok(UpdateOutcome { matched, modified })
    }

    fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        let Some(id) = self.first_matching_id(filter)? else {
            return Ok(0);
        };
        let removed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        debug!("event=employee_delete module=repo status=ok scope=one removed={removed}");
        Ok(removed as u64)
    }

    fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<u64> {
        let (clause, bind_values) = filter_clause(filter);
        let removed = self.conn.execute(
            &format!("DELETE FROM employees{clause};"),
            params_from_iter(bind_values),
        )?;
        debug!("event=employee_delete module=repo status=ok scope=many removed={removed}");
        Ok(removed as u64)
    }

    fn delete_instance(&self, employee: &Employee) -> RepoResult<bool> {
        let Some(id) = employee.id else {
            return Ok(false);
        };
        let removed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id.to_string()])?;
        debug!("event=employee_delete module=repo status=ok scope=instance removed={removed}");
        Ok(removed > 0)
    }
}

/// Builds ` WHERE ...` for `filter` with positional bind values in order.
fn filter_clause(filter: &EmployeeFilter) -> (String, Vec<Value>) {
    let mut clause = String::from(" WHERE 1 = 1");
    let mut bind_values = Vec::new();

    if filter.matches_nothing() {
        clause.push_str(" AND 0 = 1");
    }
    if let Some(id) = filter.id {
        clause.push_str(" AND id = ?");
        bind_values.push(Value::Text(id.to_string()));
    }
    for field in EmployeeField::REQUIRED {
        if let Some(expected) = filter.criterion(field) {
            clause.push_str(&format!(" AND {} = ?", column_name(field)));
            bind_values.push(Value::Text(expected.to_string()));
        }
    }

    (clause, bind_values)
}

fn column_name(field: EmployeeField) -> &'static str {
    match field {
        EmployeeField::Id => "id",
        EmployeeField::FirstName => "first_name",
        EmployeeField::LastName => "last_name",
        EmployeeField::Department => "department",
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in employees.id"))
    })?;

    let employee = Employee::new(
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
        row.get::<_, String>("department")?,
    )
    .into_persisted(id);
    employee
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("row {id}: {err}")))?;
    Ok(employee)
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, EMPLOYEES_TABLE)? {
        return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, EMPLOYEES_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: EMPLOYEES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
