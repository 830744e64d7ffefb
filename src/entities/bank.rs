// 🏦 Bank Entity - lookup and search over the `bank` table
//
// Bank values are built per query and never cached. Every lookup validates
// its code first; absence is `None` or an empty list, never an error.

use crate::codes::{BankCode, BranchCode};
use crate::db::like_prefix;
use crate::entities::branch::Branch;
use crate::error::Result;
use crate::kana::SearchKey;
use crate::rules::MAJOR_BANK_CODES;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const BANK_COLUMNS: &str = "bank_code, name, full_name, zen_kana, han_kana";
const BRANCH_COLUMNS: &str = "branch_code, name, zen_kana, han_kana";

// ============================================================================
// BANK ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bank {
    pub bank_code: String,
    pub name: String,
    pub full_name: String,
    pub zen_kana: String,
    pub han_kana: String,
}

impl Bank {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Bank {
            bank_code: row.get(0)?,
            name: row.get(1)?,
            full_name: row.get(2)?,
            zen_kana: row.get(3)?,
            han_kana: row.get(4)?,
        })
    }

    fn query(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Bank>> {
        let mut stmt = conn.prepare(sql)?;
        let banks = stmt
            .query_map(params, Bank::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(banks)
    }

    /// Single bank by code (`1`, `"1"` and `"0001"` are the same bank).
    pub fn get(conn: &Connection, code: impl ToString) -> Result<Option<Bank>> {
        let code = BankCode::parse(code)?;

        let bank = conn
            .query_row(
                &format!("SELECT {} FROM bank WHERE bank_code = ?1", BANK_COLUMNS),
                params![code.as_str()],
                Bank::from_row,
            )
            .optional()?;

        Ok(bank)
    }

    /// Banks matching `key`. A valid code is an exact lookup; a katakana key
    /// (any width, or hiragana) is a reading prefix; anything else is a
    /// name prefix.
    pub fn search(conn: &Connection, key: &str) -> Result<Vec<Bank>> {
        if let Ok(code) = BankCode::parse(key) {
            return Ok(Bank::get(conn, code)?.into_iter().collect());
        }

        let key = SearchKey::route(key);
        debug!(column = key.column(), key = key.text(), "bank search");

        Bank::query(
            conn,
            &format!(
                "SELECT {} FROM bank WHERE {} LIKE ?1 ESCAPE '\\' ORDER BY rowid",
                BANK_COLUMNS,
                key.column()
            ),
            params![like_prefix(key.text())],
        )
    }

    /// The fixed set of major banks, in store order.
    pub fn major_banks(conn: &Connection) -> Result<Vec<Bank>> {
        let placeholders = vec!["?"; MAJOR_BANK_CODES.len()].join(", ");

        Bank::query(
            conn,
            &format!(
                "SELECT {} FROM bank WHERE bank_code IN ({}) ORDER BY rowid",
                BANK_COLUMNS, placeholders
            ),
            params_from_iter(MAJOR_BANK_CODES.iter()),
        )
    }

    // ========================================================================
    // BRANCHES OF THIS BANK
    // ========================================================================

    fn query_branches(
        &self,
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Branch>> {
        let mut stmt = conn.prepare(sql)?;
        let branches = stmt
            .query_map(params, |row| Branch::from_row(self, row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(branches)
    }

    /// Every branch row of this bank (sub-offices included), by branch code.
    pub fn branches(&self, conn: &Connection) -> Result<Vec<Branch>> {
        self.query_branches(
            conn,
            &format!(
                "SELECT {} FROM branch WHERE bank_code = ?1 ORDER BY branch_code, rowid",
                BRANCH_COLUMNS
            ),
            params![self.bank_code],
        )
    }

    /// Branch rows with this code: the primary office, then its sub-offices.
    pub fn get_branch(&self, conn: &Connection, code: impl ToString) -> Result<Vec<Branch>> {
        let code = BranchCode::parse(code)?;

        self.query_branches(
            conn,
            &format!(
                "SELECT {} FROM branch WHERE bank_code = ?1 AND branch_code = ?2 ORDER BY rowid",
                BRANCH_COLUMNS
            ),
            params![self.bank_code, code.as_str()],
        )
    }

    /// Branch-scoped `search`: valid branch code, reading prefix or name prefix.
    pub fn search_branch(&self, conn: &Connection, key: &str) -> Result<Vec<Branch>> {
        if let Ok(code) = BranchCode::parse(key) {
            return self.get_branch(conn, code);
        }

        let key = SearchKey::route(key);
        debug!(bank_code = %self.bank_code, column = key.column(), key = key.text(), "branch search");

        self.query_branches(
            conn,
            &format!(
                "SELECT {} FROM branch WHERE bank_code = ?1 AND {} LIKE ?2 ESCAPE '\\' ORDER BY rowid",
                BRANCH_COLUMNS,
                key.column()
            ),
            params![self.bank_code, like_prefix(key.text())],
        )
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.bank_code, self.full_name, self.zen_kana)
    }
}

// ============================================================================
// TESTS
// ============================================================================
