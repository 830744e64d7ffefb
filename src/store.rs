// Store handles
//
// `Zengin` owns one read-only connection: opened on construction, closed
// when dropped (or explicitly with `close`). Use one per thread/worker.
// The free functions share a single lazily opened handle behind a mutex
// for callers that don't need isolation.

use crate::config::Config;
use crate::db::has_schema;
use crate::entities::{Bank, Branch};
use crate::error::{Result, ZenginError};
use once_cell::sync::OnceCell;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub struct Zengin {
    conn: Connection,
}

impl Zengin {
    /// Open an existing store read-only. Fails if the file is missing,
    /// is not a database, or lacks the lookup tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        if !has_schema(&conn)? {
            return Err(ZenginError::MissingSchema {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), "opened store");
        Ok(Zengin { conn })
    }

    /// Open the store named by `ZENGIN_DB`.
    pub fn open_default() -> Result<Self> {
        Zengin::open(Config::from_env().db_path)
    }

    /// Wrap an already open connection (e.g. an in-memory store).
    pub fn from_connection(conn: Connection) -> Result<Self> {
        if !has_schema(&conn)? {
            return Err(ZenginError::MissingSchema {
                path: PathBuf::from(conn.path().unwrap_or(":memory:")),
            });
        }
        Ok(Zengin { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close now and report any error instead of swallowing it in `Drop`.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| ZenginError::Store(err))
    }

    pub fn bank_get(&self, code: impl ToString) -> Result<Option<Bank>> {
        Bank::get(&self.conn, code)
    }

    pub fn bank_search(&self, key: &str) -> Result<Vec<Bank>> {
        Bank::search(&self.conn, key)
    }

    pub fn bank_major(&self) -> Result<Vec<Bank>> {
        Bank::major_banks(&self.conn)
    }

    /// All branches of a bank; empty when the bank does not exist.
    pub fn bank_branches(&self, code: impl ToString) -> Result<Vec<Branch>> {
        match Bank::get(&self.conn, code)? {
            Some(bank) => bank.branches(&self.conn),
            None => Ok(Vec::new()),
        }
    }

    pub fn branch_get(
        &self,
        bank_code: impl ToString,
        branch_code: impl ToString,
    ) -> Result<Vec<Branch>> {
        Branch::get(&self.conn, bank_code, branch_code)
    }

    pub fn branch_search(&self, bank_code: impl ToString, key: &str) -> Result<Vec<Branch>> {
        Branch::search(&self.conn, bank_code, key)
    }
}

// ============================================================================
// SHARED HANDLE
// ============================================================================

static SHARED: OnceCell<Mutex<Zengin>> = OnceCell::new();

/// Run `f` against the process-wide handle, opening it from `ZENGIN_DB` on
/// first use. An open failure is returned and retried on the next call.
pub fn with_shared<T>(f: impl FnOnce(&Zengin) -> Result<T>) -> Result<T> {
    let shared = SHARED.get_or_try_init(|| Zengin::open_default().map(Mutex::new))?;
    let zengin = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&zengin)
}

pub fn bank_get(code: impl ToString) -> Result<Option<Bank>> {
    with_shared(|z| z.bank_get(code))
}

pub fn bank_search(key: &str) -> Result<Vec<Bank>> {
    with_shared(|z| z.bank_search(key))
}

pub fn bank_major() -> Result<Vec<Bank>> {
    with_shared(|z| z.bank_major())
}

pub fn bank_branches(code: impl ToString) -> Result<Vec<Branch>> {
    with_shared(|z| z.bank_branches(code))
}

pub fn branch_get(bank_code: impl ToString, branch_code: impl ToString) -> Result<Vec<Branch>> {
    with_shared(|z| z.branch_get(bank_code, branch_code))
}

pub fn branch_search(bank_code: impl ToString, key: &str) -> Result<Vec<Branch>> {
    with_shared(|z| z.branch_search(bank_code, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_connection;

    #[test]
    fn test_handle_api() {
        let zengin = Zengin::from_connection(sample_connection()).unwrap();

        assert_eq!(zengin.bank_get("1").unwrap().unwrap().name, "みずほ");
        assert_eq!(zengin.bank_search("ミツ").unwrap().len(), 2);
        assert_eq!(zengin.bank_major().unwrap().len(), 5);
        assert_eq!(zengin.bank_branches("0001").unwrap().len(), 5);
        assert!(zengin.bank_branches("0002").unwrap().is_empty());
        assert_eq!(zengin.branch_get("0009", "100").unwrap().len(), 1);
        assert_eq!(zengin.branch_search("0010", "東京").unwrap().len(), 1);

        zengin.close().unwrap();
    }

    #[test]
    fn test_from_connection_requires_schema() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            Zengin::from_connection(conn),
            Err(ZenginError::MissingSchema { .. })
        ));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let result = Zengin::open("/nonexistent/dir/zengin.db");
        assert!(matches!(result, Err(ZenginError::Store(_))));
    }

    #[test]
    fn test_validation_propagates_through_handle() {
        let zengin = Zengin::from_connection(sample_connection()).unwrap();
        assert!(matches!(zengin.bank_get("abc"), Err(ZenginError::Validation(_))));
        assert!(matches!(zengin.bank_branches(99999), Err(ZenginError::Validation(_))));
    }
}
