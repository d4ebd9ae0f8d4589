#![allow(dead_code)]

use employee_core::{
    Department, DynEmployeeRepository, Employee, InMemoryEmployeeRepository,
    SqliteEmployeeRepository,
};

/// Every backend under test, each freshly created and empty.
pub fn backends() -> Vec<(&'static str, DynEmployeeRepository)> {
    let memory: DynEmployeeRepository = Box::new(InMemoryEmployeeRepository::new());
    let sqlite: DynEmployeeRepository =
        Box::new(SqliteEmployeeRepository::open_in_memory().unwrap());
    vec![("memory", memory), ("sqlite", sqlite)]
}

pub fn employee(name: &str, department: Department, salary: f64) -> Employee {
    Employee::new(name, department, salary).unwrap()
}
