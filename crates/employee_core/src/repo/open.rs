//! Config-driven backend selection.

use crate::config::{StoreConfig, StoreKind};
use crate::repo::employee_repo::{EmployeeRepository, RepoResult, SqliteEmployeeRepository};
use crate::repo::memory_repo::InMemoryEmployeeRepository;
use log::info;

/// Boxed repository usable from any thread.
pub type DynEmployeeRepository = Box<dyn EmployeeRepository + Send + Sync>;

/// Opens the backend described by `config`.
///
/// # Errors
/// - Returns a storage error when the SQLite database cannot be opened or
///   carries an incompatible schema.
pub fn open_repository(config: &StoreConfig) -> RepoResult<DynEmployeeRepository> {
    let repo: DynEmployeeRepository = match config.kind {
        StoreKind::Memory => Box::new(InMemoryEmployeeRepository::new()),
        StoreKind::Sqlite => match config.sqlite_path.as_deref() {
            Some(path) => Box::new(SqliteEmployeeRepository::open(path)?),
            None => Box::new(SqliteEmployeeRepository::open_in_memory()?),
        },
    };

    info!(
        "event=repo_open module=repo status=ok store={}",
        config.kind.as_str()
    );
    Ok(repo)
}
