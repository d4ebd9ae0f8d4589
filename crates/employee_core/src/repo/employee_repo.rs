//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the storage-agnostic CRUD/search/aggregate contract.
//! - Keep SQL details inside the durable backend.
//!
//! # Invariants
//! - Write paths call `Employee::validate()` before touching storage.
//! - Ids come from the store and are never reused after deletion.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Listing order is ascending id, which is insertion order.

use crate::db::migrations::latest_version;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::employee::{Department, Employee, EmployeeId, EmployeeValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, department, salary FROM employees";

const REQUIRED_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "department",
    "salary",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Failures of the storage medium, as opposed to bad input or missing ids.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// A persisted row violates the employee schema or invariants.
    InvalidData(String),
    /// Another thread panicked while holding the store lock.
    LockPoisoned,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::LockPoisoned => write!(f, "employee store lock poisoned"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

/// Error taxonomy shared by every repository backend.
#[derive(Debug)]
pub enum RepoError {
    /// No record exists for the id.
    NotFound(EmployeeId),
    /// Input violates an employee invariant.
    Validation(EmployeeValidationError),
    /// Underlying medium failed; input may be retried.
    Storage(StorageError),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(StorageError::Db(value))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Db(DbError::Sqlite(value)))
    }
}

/// Aggregate figures over one consistent snapshot of the record set.
///
/// Empty collections report `0.0` for both salary figures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmployeeSummary {
    pub count: usize,
    pub salary_average: f64,
    pub max_salary: f64,
    pub hr_count: usize,
}

impl EmployeeSummary {
    /// Single-pass reduction over `records`.
    ///
    /// The mean is updated incrementally so large salaries cannot overflow a
    /// running total, and is capped at `max_salary`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Employee>) -> Self {
        let mut count = 0_usize;
        let mut hr_count = 0_usize;
        let mut mean = 0.0_f64;
        let mut max_salary = 0.0_f64;

        for employee in records {
            count += 1;
            mean += (employee.salary - mean) / count as f64;
            max_salary = max_salary.max(employee.salary);
            if employee.is_hr() {
                hr_count += 1;
            }
        }

        Self {
            count,
            salary_average: mean.min(max_salary),
            max_salary,
            hr_count,
        }
    }
}

/// Repository contract for employee records.
///
/// Every backend gives callers the same observable behavior; the bundled
/// ones are `Send + Sync` and may be shared behind an `Arc`.
pub trait EmployeeRepository {
    /// Every record in ascending id order; empty when the store is empty.
    fn get_all(&self) -> RepoResult<Vec<Employee>>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Employee>;
    /// Stores `employee` under a fresh id, ignoring `employee.id`.
    fn add(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Replaces every field except the id of the record at `id`.
    fn update(&self, id: EmployeeId, employee: &Employee) -> RepoResult<Employee>;
    fn delete(&self, id: EmployeeId) -> RepoResult<()>;
    /// Case-insensitive substring match on `name`. Blank terms match everything.
    fn search(&self, term: &str) -> RepoResult<Vec<Employee>>;
    fn count(&self) -> RepoResult<usize>;
    fn salary_average(&self) -> RepoResult<f64>;
    fn max_salary(&self) -> RepoResult<f64>;
    fn hr_employees_count(&self) -> RepoResult<usize>;
    fn summary(&self) -> RepoResult<EmployeeSummary>;
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for Box<R> {
    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        (**self).get_all()
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Employee> {
        (**self).find_by_id(id)
    }

    fn add(&self, employee: &Employee) -> RepoResult<Employee> {
        (**self).add(employee)
    }

    fn update(&self, id: EmployeeId, employee: &Employee) -> RepoResult<Employee> {
        (**self).update(id, employee)
    }

    fn delete(&self, id: EmployeeId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Employee>> {
        (**self).search(term)
    }

    fn count(&self) -> RepoResult<usize> {
        (**self).count()
    }

    fn salary_average(&self) -> RepoResult<f64> {
        (**self).salary_average()
    }

    fn max_salary(&self) -> RepoResult<f64> {
        (**self).max_salary()
    }

    fn hr_employees_count(&self) -> RepoResult<usize> {
        (**self).hr_employees_count()
    }

    fn summary(&self) -> RepoResult<EmployeeSummary> {
        (**self).summary()
    }
}

/// Lowercased search needle, or `None` when the term is blank.
///
/// Non-blank terms keep their surrounding whitespace; it is part of the substring.
pub(crate) fn search_needle(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}

pub(crate) fn name_matches(employee: &Employee, needle: &str) -> bool {
    employee.name.to_lowercase().contains(needle)
}

/// SQLite-backed employee repository.
///
/// Owns its connection; all access is serialized through one mutex, so a
/// reader never observes a partially applied write.
pub struct SqliteEmployeeRepository {
    conn: Mutex<Connection>,
}

impl SqliteEmployeeRepository {
    /// Wraps a migrated connection after verifying its schema.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database and wraps it.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn conn(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Storage(StorageError::LockPoisoned))
    }
}

impl EmployeeRepository for SqliteEmployeeRepository {
    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        let conn = self.conn()?;
        load_all(&conn)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Employee> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return parse_employee_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn add(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO employees (name, department, salary) VALUES (?1, ?2, ?3);",
            params![
                employee.name.as_str(),
                employee.department.as_str(),
                employee.salary,
            ],
        )?;

        Ok(employee.assigned(conn.last_insert_rowid()))
    }

    fn update(&self, id: EmployeeId, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                department = ?2,
                salary = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                employee.name.as_str(),
                employee.department.as_str(),
                employee.salary,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(employee.assigned(id))
    }

    fn delete(&self, id: EmployeeId) -> RepoResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM employees WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Employee>> {
        let conn = self.conn()?;
        let all = load_all(&conn)?;
        // SQLite's LIKE/lower() only fold ASCII; filter here so both backends agree.
        let Some(needle) = search_needle(term) else {
            return Ok(all);
        };
        Ok(all
            .into_iter()
            .filter(|employee| name_matches(employee, &needle))
            .collect())
    }

    fn count(&self) -> RepoResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        to_count(count, "COUNT(*)")
    }

    fn salary_average(&self) -> RepoResult<f64> {
        let conn = self.conn()?;
        // AVG sums into one double and reaches `inf` near `f64::MAX`; cap it at MAX.
        let average = conn.query_row(
            "SELECT COALESCE(MIN(AVG(salary), MAX(salary)), 0.0) FROM employees;",
            [],
            |row| row.get(0),
        )?;
        Ok(average)
    }

    fn max_salary(&self) -> RepoResult<f64> {
        let conn = self.conn()?;
        let max = conn.query_row(
            "SELECT COALESCE(MAX(salary), 0.0) FROM employees;",
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    fn hr_employees_count(&self) -> RepoResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE department = ?1;",
            params![Department::Hr.as_str()],
            |row| row.get(0),
        )?;
        to_count(count, "hr count")
    }

    fn summary(&self) -> RepoResult<EmployeeSummary> {
        let conn = self.conn()?;
        let (count, salary_average, max_salary, hr_count): (i64, f64, f64, i64) = conn
            .query_row(
                "SELECT
                    COUNT(*),
                    COALESCE(MIN(AVG(salary), MAX(salary)), 0.0),
                    COALESCE(MAX(salary), 0.0),
                    COALESCE(SUM(CASE WHEN department = ?1 THEN 1 ELSE 0 END), 0)
                 FROM employees;",
                params![Department::Hr.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        Ok(EmployeeSummary {
            count: to_count(count, "COUNT(*)")?,
            salary_average,
            max_salary,
            hr_count: to_count(hr_count, "hr count")?,
        })
    }
}

fn load_all(conn: &Connection) -> RepoResult<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut employees = Vec::new();
    while let Some(row) = rows.next()? {
        employees.push(parse_employee_row(row)?);
    }
    Ok(employees)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;

    let department_text: String = row.get("department")?;
    let department = Department::parse(&department_text).ok_or_else(|| {
        StorageError::InvalidData(format!(
            "invalid department `{department_text}` in employees.department (id {id})"
        ))
    })?;

    Employee::with_id(id, row.get::<_, String>("name")?, department, row.get("salary")?).map_err(
        |err| {
            RepoError::Storage(StorageError::InvalidData(format!(
                "employee {id} violates invariant on `{}`: {err}",
                err.field()
            )))
        },
    )
}

fn to_count(value: i64, what: &str) -> RepoResult<usize> {
    usize::try_from(value).map_err(|_| {
        RepoError::Storage(StorageError::InvalidData(format!(
            "negative {what} `{value}` returned by employees query"
        )))
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        }
        .into());
    }

    if !table_exists(conn, "employees")? {
        return Err(StorageError::MissingRequiredTable("employees").into());
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "employees", column)? {
            return Err(StorageError::MissingRequiredColumn {
                table: "employees",
                column,
            }
            .into());
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
