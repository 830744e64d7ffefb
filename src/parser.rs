// 🏗️ Record Parser
// Reads the six-field Zengin export (CRLF, UTF-8, no header row)

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

// ============================================================================
// CORE TYPES
// ============================================================================

/// FlatRecord - one line of the export, before the hierarchy is rebuilt.
/// Flags are kept as the raw strings; the builder interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub line: usize,              // 1-based line in the source
    pub bank_code: String,
    pub branch_code: String,      // empty on bank headers
    pub han_kana: String,         // untrimmed half-width reading
    pub name: String,
    pub branch_flag: String,      // 名称区分: "1" bank, "2" branch
    pub sub_branch: String,       // 出張所フラグ: "1" primary, "2" sub-office
}

impl FlatRecord {
    /// Build a bank header record.
    pub fn bank(line: usize, bank_code: &str, han_kana: &str, name: &str) -> Self {
        FlatRecord {
            line,
            bank_code: bank_code.to_string(),
            branch_code: String::new(),
            han_kana: han_kana.to_string(),
            name: name.to_string(),
            branch_flag: "1".to_string(),
            sub_branch: String::new(),
        }
    }

    /// Build a branch or sub-office record.
    pub fn branch(
        line: usize,
        bank_code: &str,
        branch_code: &str,
        han_kana: &str,
        name: &str,
        sub_branch: &str,
    ) -> Self {
        FlatRecord {
            line,
            bank_code: bank_code.to_string(),
            branch_code: branch_code.to_string(),
            han_kana: han_kana.to_string(),
            name: name.to_string(),
            branch_flag: "2".to_string(),
            sub_branch: sub_branch.to_string(),
        }
    }
}

// ============================================================================
// READERS
// ============================================================================

/// Parse records from any reader. Short rows are padded with empty fields.
///
/// Records end at LF so positions count physical lines in CRLF exports;
/// the trailing `\r` lands in the last field and is trimmed away.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<FlatRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(reader);

    let mut records = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let row = result?;
        let field = |i: usize| row.get(i).unwrap_or("").to_string();

        if row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let line = row
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(index + 1);

        records.push(FlatRecord {
            line,
            bank_code: field(0).trim_start_matches('\u{feff}').trim().to_string(),
            branch_code: field(1).trim().to_string(),
            han_kana: field(2),
            name: field(3).trim().to_string(),
            branch_flag: field(4).trim().to_string(),
            sub_branch: field(5).trim().to_string(),
        });
    }

    Ok(records)
}

/// Load records from the export file.
pub fn load_records(path: &Path) -> Result<Vec<FlatRecord>> {
    let file = File::open(path)?;
    let records = parse_records(file)?;
    info!(path = %path.display(), records = records.len(), "loaded export");
    Ok(records)
}
