//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record held by repositories.
//! - Enforce field-level invariants at construction and assignment.
//!
//! # Invariants
//! - `id` is assigned by a repository and never reused for another record.
//! - `name` is non-empty after trimming.
//! - `salary` is finite and never negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository-assigned identifier for an employee record.
pub type EmployeeId = i64;

/// Placeholder id carried by records that have not been persisted yet.
pub const UNASSIGNED_ID: EmployeeId = 0;

/// Department (role category) an employee belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Human resources; counted by the HR headcount aggregate.
    Hr,
    Engineering,
    Sales,
    Finance,
    Operations,
    Other,
}

impl Department {
    /// Every department, in declaration order.
    pub const ALL: [Department; 6] = [
        Department::Hr,
        Department::Engineering,
        Department::Sales,
        Department::Finance,
        Department::Operations,
        Department::Other,
    ];

    /// Stable lowercase key used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Engineering => "engineering",
            Self::Sales => "sales",
            Self::Finance => "finance",
            Self::Operations => "operations",
            Self::Other => "other",
        }
    }

    /// Parses a storage key produced by [`Department::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|department| department.as_str() == value)
    }

    pub fn is_hr(self) -> bool {
        matches!(self, Self::Hr)
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures for [`Employee`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmployeeValidationError {
    /// `name` is empty or whitespace only.
    EmptyName,
    /// `salary` is below zero.
    NegativeSalary(f64),
    /// `salary` is NaN or infinite.
    NonFiniteSalary,
}

impl EmployeeValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::NegativeSalary(_) | Self::NonFiniteSalary => "salary",
        }
    }

    /// Short identifier of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::EmptyName => "non_empty",
            Self::NegativeSalary(_) => "non_negative",
            Self::NonFiniteSalary => "finite",
        }
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "employee name must not be empty"),
            Self::NegativeSalary(value) => {
                write!(f, "employee salary must not be negative, got {value}")
            }
            Self::NonFiniteSalary => write!(f, "employee salary must be a finite number"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// One employee record.
///
/// Structural equality compares every field; use [`Employee::same_record`]
/// for identity comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EmployeeWire")]
pub struct Employee {
    /// Assigned by the repository on add. Ignored when passed into `add`.
    pub id: EmployeeId,
    pub name: String,
    pub department: Department,
    /// Never negative. Use [`Employee::set_salary`] to change it safely.
    pub salary: f64,
}

impl Employee {
    /// Creates an unpersisted employee after validating its fields.
    pub fn new(
        name: impl Into<String>,
        department: Department,
        salary: f64,
    ) -> Result<Self, EmployeeValidationError> {
        Self::with_id(UNASSIGNED_ID, name, department, salary)
    }

    /// Creates an employee with a known id, e.g. a row read back from storage.
    pub fn with_id(
        id: EmployeeId,
        name: impl Into<String>,
        department: Department,
        salary: f64,
    ) -> Result<Self, EmployeeValidationError> {
        let employee = Self {
            id,
            name: name.into(),
            department,
            salary,
        };
        employee.validate()?;
        Ok(employee)
    }

    /// Checks all field invariants.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        validate_salary(self.salary)
    }

    /// Replaces the salary; the record is unchanged when `salary` is invalid.
    pub fn set_salary(&mut self, salary: f64) -> Result<(), EmployeeValidationError> {
        validate_salary(salary)?;
        self.salary = salary;
        Ok(())
    }

    pub fn is_hr(&self) -> bool {
        self.department.is_hr()
    }

    /// Identity comparison by `id`.
    pub fn same_record(&self, other: &Employee) -> bool {
        self.id == other.id
    }

    /// Returns a copy carrying `id`; used by repositories after assignment.
    pub(crate) fn assigned(&self, id: EmployeeId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

fn validate_salary(salary: f64) -> Result<(), EmployeeValidationError> {
    if !salary.is_finite() {
        return Err(EmployeeValidationError::NonFiniteSalary);
    }
    if salary < 0.0 {
        return Err(EmployeeValidationError::NegativeSalary(salary));
    }
    Ok(())
}

#[derive(Deserialize)]
struct EmployeeWire {
    #[serde(default)]
    id: EmployeeId,
    name: String,
    department: Department,
    salary: f64,
}

impl TryFrom<EmployeeWire> for Employee {
    type Error = EmployeeValidationError;

    fn try_from(value: EmployeeWire) -> Result<Self, Self::Error> {
        Employee::with_id(value.id, value.name, value.department, value.salary)
    }
}
