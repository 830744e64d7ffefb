// Zengin - Japanese bank and branch code lookup
// Build pipeline (export → hierarchy → store) and the query engine over it

pub mod builder;
pub mod codes;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod kana;
pub mod parser;
pub mod rules;
pub mod store;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use builder::{
    build_hierarchy, BankEntry, BranchEntry, Hierarchy, HierarchyBuilder, SubBranchFlag,
};
pub use codes::{is_valid_bank_code, is_valid_branch_code, BankCode, BranchCode};
pub use config::Config;
pub use db::{build_store, setup_database, verify_counts, write_hierarchy, StoreStats};
pub use entities::{Bank, Branch};
pub use error::{IngestionError, Result, ValidationError, ZenginError};
pub use kana::{fold_search_key, han_to_zen, is_full_katakana, SearchKey};
pub use parser::{load_records, parse_records, FlatRecord};
pub use store::{
    bank_branches, bank_get, bank_major, bank_search, branch_get, branch_search, with_shared,
    Zengin,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the whole build: parse the export, rebuild the hierarchy, write the
/// JSON document (when a path is given) and the store. Nothing is written
/// unless every record is consistent, and the document is removed again if
/// the store cannot be written.
pub fn build(
    export: &std::path::Path,
    db_path: &std::path::Path,
    json_path: Option<&std::path::Path>,
) -> Result<StoreStats> {
    let records = load_records(export)?;
    let hierarchy = build_hierarchy(records)?;

    if let Some(json_path) = json_path {
        hierarchy.write_json(json_path)?;
    }

    match build_store(db_path, &hierarchy) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            if let Some(json_path) = json_path {
                if let Err(remove_err) = std::fs::remove_file(json_path) {
                    tracing::warn!(
                        path = %json_path.display(),
                        error = %remove_err,
                        "could not remove document after failed store write"
                    );
                }
            }
            Err(err)
        }
    }
}
