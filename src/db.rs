// 🗄️ Store - schema and hierarchy writer
// Flattens the hierarchy into the `bank` and `branch` tables

use crate::builder::{BranchEntry, Hierarchy};
use crate::error::Result;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use tracing::info;

/// Row counts of a written store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub banks: i64,
    pub branches: i64,
}

/// Drop and recreate both tables plus the (bank_code, branch_code) index
pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Bank Table
    // ==========================================================================
    conn.execute("DROP TABLE IF EXISTS bank", [])?;
    conn.execute(
        "CREATE TABLE bank (
            bank_code TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            full_name TEXT NOT NULL,
            zen_kana TEXT NOT NULL,
            han_kana TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Branch Table (sub-offices share their primary's branch_code)
    // ==========================================================================
    conn.execute("DROP TABLE IF EXISTS branch", [])?;
    conn.execute(
        "CREATE TABLE branch (
            bank_code TEXT NOT NULL,
            branch_code TEXT NOT NULL,
            name TEXT NOT NULL,
            zen_kana TEXT NOT NULL,
            han_kana TEXT NOT NULL,
            sub_branch TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX ix_branch_code ON branch(bank_code, branch_code)",
        [],
    )?;

    Ok(())
}

fn insert_branch(tx: &Transaction, bank_code: &str, branch: &BranchEntry) -> Result<()> {
    tx.execute(
        "INSERT INTO branch (bank_code, branch_code, name, zen_kana, han_kana, sub_branch)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            bank_code,
            branch.branch_code,
            branch.name,
            branch.zen_kana,
            branch.han_kana,
            branch.sub_branch.as_str(),
        ],
    )?;
    Ok(())
}

/// Flatten the hierarchy into the two tables, in one transaction.
/// Rows keep source order: each primary branch is followed by its sub-offices.
pub fn write_hierarchy(conn: &mut Connection, hierarchy: &Hierarchy) -> Result<StoreStats> {
    let tx = conn.transaction()?;
    setup_database(&tx)?;

    for bank in hierarchy.banks() {
        tx.execute(
            "INSERT INTO bank (bank_code, name, full_name, zen_kana, han_kana)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bank.bank_code,
                bank.name,
                bank.full_name,
                bank.zen_kana,
                bank.han_kana,
            ],
        )?;

        for branch in &bank.branches {
            insert_branch(&tx, &bank.bank_code, branch)?;
            for sub in &branch.sub_branches {
                insert_branch(&tx, &bank.bank_code, sub)?;
            }
        }
    }

    let stats = verify_counts(&tx)?;
    tx.commit()?;

    info!(banks = stats.banks, branches = stats.branches, "wrote store");
    Ok(stats)
}

/// Create (or replace) the store file at `path`.
pub fn build_store(path: &Path, hierarchy: &Hierarchy) -> Result<StoreStats> {
    let mut conn = Connection::open(path)?;
    let stats = write_hierarchy(&mut conn, hierarchy)?;
    conn.close().map_err(|(_, err)| err)?;
    Ok(stats)
}

pub fn verify_counts(conn: &Connection) -> Result<StoreStats> {
    let banks: i64 = conn.query_row("SELECT COUNT(*) FROM bank", [], |row| row.get(0))?;
    let branches: i64 = conn.query_row("SELECT COUNT(*) FROM branch", [], |row| row.get(0))?;

    Ok(StoreStats { banks, branches })
}

/// True when both lookup tables exist
pub fn has_schema(conn: &Connection) -> Result<bool> {
    let tables: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('bank', 'branch')",
        [],
        |row| row.get(0),
    )?;

    Ok(tables == 2)
}

/// LIKE pattern matching values that start with `text`.
/// `%`, `_` and `\` in the text match literally (use with `ESCAPE '\'`).
pub(crate) fn like_prefix(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 1);
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
