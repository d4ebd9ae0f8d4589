//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the narrow entry points a presentation layer calls.
//! - Emit metadata-only log events for every mutation outcome.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or id assignment.
//! - The service stays storage-agnostic.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, EmployeeSummary, RepoError, RepoResult};
use log::{debug, info, warn};

/// Use-case facade over an [`EmployeeRepository`].
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists every employee; empty when none exist.
    pub fn list(&self) -> RepoResult<Vec<Employee>> {
        self.repo.get_all()
    }

    /// Gets one employee, or `RepoError::NotFound`.
    pub fn details(&self, id: EmployeeId) -> RepoResult<Employee> {
        self.repo.find_by_id(id)
    }

    /// Creates an employee; any id on `employee` is replaced.
    pub fn create(&self, employee: &Employee) -> RepoResult<Employee> {
        log_outcome("employee_create", self.repo.add(employee), |stored| {
            stored.id
        })
    }

    /// Replaces the fields of employee `id`.
    pub fn edit(&self, id: EmployeeId, employee: &Employee) -> RepoResult<Employee> {
        log_outcome("employee_update", self.repo.update(id, employee), |_| id)
    }

    pub fn remove(&self, id: EmployeeId) -> RepoResult<()> {
        log_outcome("employee_delete", self.repo.delete(id), |_| id)
    }

    /// Name search; `None` or a blank term lists everything.
    pub fn search(&self, term: Option<&str>) -> RepoResult<Vec<Employee>> {
        let hits = self.repo.search(term.unwrap_or_default())?;
        debug!(
            "event=employee_search module=service status=ok hits={}",
            hits.len()
        );
        Ok(hits)
    }

    pub fn salary_average(&self) -> RepoResult<f64> {
        self.repo.salary_average()
    }

    pub fn max_salary(&self) -> RepoResult<f64> {
        self.repo.max_salary()
    }

    pub fn hr_employees_count(&self) -> RepoResult<usize> {
        self.repo.hr_employees_count()
    }

    /// Headcount and salary figures shown alongside the employee list.
    pub fn dashboard(&self) -> RepoResult<EmployeeSummary> {
        self.repo.summary()
    }
}

fn log_outcome<T>(
    event: &str,
    result: RepoResult<T>,
    id_of: impl FnOnce(&T) -> EmployeeId,
) -> RepoResult<T> {
    match &result {
        Ok(value) => info!(
            "event={event} module=service status=ok id={}",
            id_of(value)
        ),
        Err(RepoError::Storage(err)) => {
            warn!("event={event} module=service status=error kind=storage error={err}")
        }
        Err(err) => {
            let kind = if err.is_not_found() {
                "not_found"
            } else {
                "validation"
            };
            info!("event={event} module=service status=rejected kind={kind}");
        }
    }
    result
}
