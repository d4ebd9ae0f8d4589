mod common;

use common::{backends, employee};
use employee_core::{Department, Employee, EmployeeRepository, RepoError};

#[test]
fn added_employee_is_retrievable_unchanged() {
    for (backend, repo) in backends() {
        let stored = repo
            .add(&employee("Ada Lovelace", Department::Engineering, 95_000.0))
            .unwrap();

        let loaded = repo.find_by_id(stored.id).unwrap();
        assert_eq!(loaded, stored, "{backend}");
        assert_eq!(loaded.name, "Ada Lovelace", "{backend}");
        assert_eq!(loaded.department, Department::Engineering, "{backend}");
        assert_eq!(loaded.salary, 95_000.0, "{backend}");
    }
}

#[test]
fn add_ignores_caller_supplied_id_and_assigns_distinct_ids() {
    for (backend, repo) in backends() {
        let forged = Employee::with_id(999, "Mallory", Department::Sales, 1.0).unwrap();
        let first = repo.add(&forged).unwrap();
        let second = repo.add(&forged).unwrap();

        assert_ne!(first.id, 999, "{backend}");
        assert_ne!(first.id, second.id, "{backend}");
        assert!(second.id > first.id, "{backend}");
        assert!(repo.find_by_id(999).unwrap_err().is_not_found(), "{backend}");
    }
}

#[test]
fn add_rejects_invalid_employee_without_storing() {
    for (backend, repo) in backends() {
        let mut invalid = employee("Bob", Department::Sales, 10.0);
        invalid.salary = -10.0;
        let err = repo.add(&invalid).unwrap_err();
        assert!(err.is_validation(), "{backend}: {err}");

        invalid.salary = 10.0;
        invalid.name = String::new();
        let err = repo.add(&invalid).unwrap_err();
        assert!(
            matches!(&err, RepoError::Validation(inner) if inner.field() == "name"),
            "{backend}: {err}"
        );

        assert!(repo.get_all().unwrap().is_empty(), "{backend}");
    }
}

#[test]
fn get_all_is_empty_then_in_insertion_order() {
    for (backend, repo) in backends() {
        assert!(repo.get_all().unwrap().is_empty(), "{backend}");

        let names = ["Zed", "Amy", "Mia"];
        for name in names {
            repo.add(&employee(name, Department::Other, 1.0)).unwrap();
        }

        let listed: Vec<String> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(listed, names, "{backend}");
    }
}

#[test]
fn update_replaces_fields_but_keeps_id() {
    for (backend, repo) in backends() {
        let stored = repo.add(&employee("Carol", Department::Sales, 40_000.0)).unwrap();

        let replacement = Employee::with_id(12345, "Carol King", Department::Hr, 52_000.0).unwrap();
        let updated = repo.update(stored.id, &replacement).unwrap();

        assert_eq!(updated.id, stored.id, "{backend}");
        assert_eq!(updated.name, "Carol King", "{backend}");
        assert_eq!(repo.find_by_id(stored.id).unwrap(), updated, "{backend}");
        assert!(repo.find_by_id(12345).unwrap_err().is_not_found(), "{backend}");
    }
}

#[test]
fn invalid_update_leaves_record_unchanged() {
    for (backend, repo) in backends() {
        let stored = repo.add(&employee("Dave", Department::Finance, 30_000.0)).unwrap();

        let mut invalid = stored.clone();
        invalid.name = "Dave Renamed".to_string();
        invalid.salary = -1.0;
        let err = repo.update(stored.id, &invalid).unwrap_err();

        assert!(err.is_validation(), "{backend}: {err}");
        assert_eq!(repo.find_by_id(stored.id).unwrap(), stored, "{backend}");
    }
}

#[test]
fn missing_ids_report_not_found() {
    for (backend, repo) in backends() {
        repo.add(&employee("Erin", Department::Hr, 1.0)).unwrap();
        let before = repo.count().unwrap();
        let missing = 4242;

        assert!(
            matches!(repo.find_by_id(missing), Err(RepoError::NotFound(id)) if id == missing),
            "{backend}"
        );
        assert!(
            matches!(
                repo.update(missing, &employee("Ghost", Department::Other, 1.0)),
                Err(RepoError::NotFound(id)) if id == missing
            ),
            "{backend}"
        );
        assert!(
            matches!(repo.delete(missing), Err(RepoError::NotFound(id)) if id == missing),
            "{backend}"
        );
        assert_eq!(repo.count().unwrap(), before, "{backend}");
    }
}

#[test]
fn delete_removes_record_and_retires_id() {
    for (backend, repo) in backends() {
        let keep = repo.add(&employee("Keep", Department::Sales, 1.0)).unwrap();
        let gone = repo.add(&employee("Gone", Department::Sales, 1.0)).unwrap();

        repo.delete(gone.id).unwrap();

        assert!(repo.find_by_id(gone.id).unwrap_err().is_not_found(), "{backend}");
        assert!(repo.delete(gone.id).unwrap_err().is_not_found(), "{backend}");
        let remaining = repo.get_all().unwrap();
        assert_eq!(remaining, vec![keep], "{backend}");

        let next = repo.add(&employee("Next", Department::Sales, 1.0)).unwrap();
        assert!(next.id > gone.id, "{backend}: deleted id must not be reused");
    }
}

#[test]
fn search_is_case_insensitive_substring_on_name() {
    for (backend, repo) in backends() {
        let alice = repo.add(&employee("Alice Smith", Department::Hr, 1.0)).unwrap();
        repo.add(&employee("Bob Jones", Department::Sales, 1.0)).unwrap();

        assert_eq!(repo.search("smith").unwrap(), vec![alice.clone()], "{backend}");
        assert_eq!(repo.search("SMITH").unwrap(), vec![alice.clone()], "{backend}");
        assert_eq!(repo.search("ice sm").unwrap(), vec![alice], "{backend}");
        assert!(repo.search("  ice sm ").unwrap().is_empty(), "{backend}");
        assert!(repo.search("nobody").unwrap().is_empty(), "{backend}");
    }
}

#[test]
fn search_keeps_surrounding_whitespace_in_term() {
    for (backend, repo) in backends() {
        let smith = repo.add(&employee("Alice Smith", Department::Hr, 1.0)).unwrap();
        repo.add(&employee("Alicea Jones", Department::Sales, 1.0)).unwrap();

        assert_eq!(repo.search("alice ").unwrap(), vec![smith.clone()], "{backend}");
        assert_eq!(repo.search(" SMITH").unwrap(), vec![smith], "{backend}");
        assert_eq!(repo.search("alice").unwrap().len(), 2, "{backend}");
    }
}

#[test]
fn search_folds_non_ascii_case() {
    for (backend, repo) in backends() {
        let stored = repo.add(&employee("Émilie Östergård", Department::Other, 1.0)).unwrap();

        assert_eq!(repo.search("émilie").unwrap(), vec![stored.clone()], "{backend}");
        assert_eq!(repo.search("ÖSTERGÅRD").unwrap(), vec![stored], "{backend}");
    }
}

#[test]
fn search_does_not_treat_like_wildcards_specially() {
    for (backend, repo) in backends() {
        repo.add(&employee("Percy", Department::Other, 1.0)).unwrap();
        let literal = repo.add(&employee("100% Ready_Co", Department::Other, 1.0)).unwrap();

        assert_eq!(repo.search("_").unwrap(), vec![literal.clone()], "{backend}");
        assert_eq!(repo.search("%").unwrap(), vec![literal], "{backend}");
    }
}

#[test]
fn blank_search_returns_everything_in_list_order() {
    for (backend, repo) in backends() {
        assert!(repo.search("").unwrap().is_empty(), "{backend}");

        repo.add(&employee("One", Department::Hr, 1.0)).unwrap();
        repo.add(&employee("Two", Department::Sales, 2.0)).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(repo.search("").unwrap(), all, "{backend}");
        assert_eq!(repo.search(" \t ").unwrap(), all, "{backend}");
    }
}
