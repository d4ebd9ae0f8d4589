//! In-memory employee repository.
//!
//! # Invariants
//! - Ids are handed out from a monotonic counter and never reused.
//! - The counter and the record map change under the same write lock.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{
    name_matches, search_needle, EmployeeRepository, EmployeeSummary, RepoError, RepoResult,
    StorageError,
};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<EmployeeId, Employee>,
    last_id: EmployeeId,
}

/// Volatile employee store for tests and ephemeral hosts.
///
/// Readers share the lock; writers are exclusive.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| RepoError::Storage(StorageError::LockPoisoned))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| RepoError::Storage(StorageError::LockPoisoned))
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        Ok(self.read()?.records.values().cloned().collect())
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Employee> {
        self.read()?
            .records
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn add(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let mut state = self.write()?;
        state.last_id += 1;
        let stored = employee.assigned(state.last_id);
        state.records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(&self, id: EmployeeId, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let mut state = self.write()?;
        let slot = state.records.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        *slot = employee.assigned(id);
        Ok(slot.clone())
    }

    fn delete(&self, id: EmployeeId) -> RepoResult<()> {
        self.write()?
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Employee>> {
        let state = self.read()?;
        let matches = match search_needle(term) {
            Some(needle) => state
                .records
                .values()
                .filter(|employee| name_matches(employee, &needle))
                .cloned()
                .collect(),
            None => state.records.values().cloned().collect(),
        };
        Ok(matches)
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.read()?.records.len())
    }

    fn salary_average(&self) -> RepoResult<f64> {
        Ok(self.summary()?.salary_average)
    }

    fn max_salary(&self) -> RepoResult<f64> {
        Ok(self.summary()?.max_salary)
    }

    fn hr_employees_count(&self) -> RepoResult<usize> {
        Ok(self
            .read()?
            .records
            .values()
            .filter(|employee| employee.is_hr())
            .count())
    }

    fn summary(&self) -> RepoResult<EmployeeSummary> {
        Ok(EmployeeSummary::from_records(self.read()?.records.values()))
    }
}
