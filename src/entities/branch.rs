// 🏢 Branch Entity - a branch row composed with its owning bank
//
// A Branch embeds the Bank it belongs to by value; equality and ordering
// cover the whole composed tuple.

use crate::codes::{BankCode, BranchCode};
use crate::entities::bank::Bank;
use crate::error::Result;
use crate::rules::branch_full_name;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Branch {
    pub bank: Bank,
    pub branch_code: String,
    pub branch_name: String,
    pub branch_zen_kana: String,
    pub branch_han_kana: String,
}

impl Branch {
    /// Row layout: branch_code, name, zen_kana, han_kana
    pub(crate) fn from_row(bank: &Bank, row: &Row) -> rusqlite::Result<Self> {
        Ok(Branch {
            bank: bank.clone(),
            branch_code: row.get(0)?,
            branch_name: row.get(1)?,
            branch_zen_kana: row.get(2)?,
            branch_han_kana: row.get(3)?,
        })
    }

    pub fn bank_code(&self) -> &str {
        &self.bank.bank_code
    }

    /// Official display name: 支店 is appended unless the name is already
    /// complete (head offices, 〜店, 出張所, or banks that never suffix).
    pub fn full_name(&self) -> Option<String> {
        branch_full_name(&self.bank.bank_code, &self.branch_name)
    }

    /// Branch rows for a bank/branch code pair. Empty when the bank does not
    /// exist; both codes are validated either way.
    pub fn get(
        conn: &Connection,
        bank_code: impl ToString,
        branch_code: impl ToString,
    ) -> Result<Vec<Branch>> {
        let bank_code = BankCode::parse(bank_code)?;
        let branch_code = BranchCode::parse(branch_code)?;

        match Bank::get(conn, bank_code)? {
            Some(bank) => bank.get_branch(conn, branch_code),
            None => Ok(Vec::new()),
        }
    }

    /// Search one bank's branches by code, reading or name prefix.
    pub fn search(conn: &Connection, bank_code: impl ToString, key: &str) -> Result<Vec<Branch>> {
        let bank_code = BankCode::parse(bank_code)?;

        match Bank::get(conn, bank_code)? {
            Some(bank) => bank.search_branch(conn, key),
            None => Ok(Vec::new()),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} {} ({})",
            self.bank.bank_code,
            self.branch_code,
            self.bank.full_name,
            self.full_name().unwrap_or_default(),
            self.branch_zen_kana
        )
    }
}
