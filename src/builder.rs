// 🏦 Hierarchy Builder
// Rebuilds bank → branch → sub-office from the ordered flat export
//
// The export is order-dependent: a branch refers to a bank header seen
// earlier, and a sub-office (出張所) refers to a primary branch seen earlier
// under the same code. Records are consumed in source order, never resorted.

use crate::codes::{is_exact_code, BANK_CODE_WIDTH, BRANCH_CODE_WIDTH};
use crate::error::{IngestionError, Result};
use crate::kana::han_to_zen;
use crate::parser::FlatRecord;
use crate::rules::{exception_bank_codes, resolve_full_name};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// ============================================================================
// ENTRIES
// ============================================================================

/// 出張所フラグ of a branch record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubBranchFlag {
    /// "1": no duplicate code, or the parent office of sub-offices
    Primary,
    /// "2": sub-office sharing its parent's code
    SubOffice,
}

impl SubBranchFlag {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1" => Some(SubBranchFlag::Primary),
            "2" => Some(SubBranchFlag::SubOffice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubBranchFlag::Primary => "1",
            SubBranchFlag::SubOffice => "2",
        }
    }
}

impl Serialize for SubBranchFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchEntry {
    pub branch_code: String,
    pub name: String,
    pub zen_kana: String,
    pub han_kana: String,
    pub sub_branch: SubBranchFlag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_branches: Vec<BranchEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankEntry {
    pub bank_code: String,
    pub name: String,
    pub full_name: String,
    pub zen_kana: String,
    pub han_kana: String,
    /// Primary branches in source order; serialized as a code-keyed map.
    #[serde(serialize_with = "serialize_branches")]
    pub branches: Vec<BranchEntry>,
}

impl BankEntry {
    pub fn branch(&self, branch_code: &str) -> Option<&BranchEntry> {
        self.branches.iter().find(|b| b.branch_code == branch_code)
    }
}

fn serialize_branches<S: Serializer>(
    branches: &[BranchEntry],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(branches.iter().map(|b| (&b.branch_code, b)))
}

// ============================================================================
// HIERARCHY
// ============================================================================

/// The rebuilt data set, banks in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    banks: Vec<BankEntry>,
}

impl Hierarchy {
    pub fn banks(&self) -> &[BankEntry] {
        &self.banks
    }

    pub fn bank(&self, bank_code: &str) -> Option<&BankEntry> {
        self.banks.iter().find(|b| b.bank_code == bank_code)
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    /// Branch rows including sub-offices, as written to the store.
    pub fn branch_count(&self) -> usize {
        self.banks
            .iter()
            .flat_map(|bank| &bank.branches)
            .map(|branch| 1 + branch.sub_branches.len())
            .sum()
    }

    /// Nested JSON document: bank_code → bank → branches → sub_branches.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        info!(path = %path.display(), banks = self.bank_count(), "wrote hierarchy document");
        Ok(())
    }
}

impl Serialize for Hierarchy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.banks.iter().map(|b| (&b.bank_code, b)))
    }
}

// ============================================================================
// BUILDER
// ============================================================================

#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    banks: Vec<BankEntry>,
    bank_index: HashMap<String, usize>,
    branch_index: HashMap<(String, String), usize>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one record in source order.
    pub fn push(&mut self, record: FlatRecord) -> std::result::Result<(), IngestionError> {
        let line = record.line;

        if !is_exact_code(&record.bank_code, BANK_CODE_WIDTH) {
            return Err(IngestionError::MalformedCode {
                line,
                field: "bank_code",
                value: record.bank_code,
            });
        }

        let han_kana = record.han_kana.trim().to_string();
        let zen_kana = han_to_zen(&han_kana);

        match record.branch_flag.as_str() {
            "1" => self.push_bank(line, record.bank_code, record.name, zen_kana, han_kana),
            "2" => self.push_branch(record, zen_kana, han_kana),
            other => Err(IngestionError::InvalidRecordType {
                line,
                value: other.to_string(),
            }),
        }
    }

    fn push_bank(
        &mut self,
        line: usize,
        bank_code: String,
        name: String,
        zen_kana: String,
        han_kana: String,
    ) -> std::result::Result<(), IngestionError> {
        if self.bank_index.contains_key(&bank_code) {
            return Err(IngestionError::DuplicateBank { line, bank_code });
        }

        self.bank_index.insert(bank_code.clone(), self.banks.len());
        self.banks.push(BankEntry {
            bank_code,
            name,
            full_name: String::new(),
            zen_kana,
            han_kana,
            branches: Vec::new(),
        });
        Ok(())
    }

    fn push_branch(
        &mut self,
        record: FlatRecord,
        zen_kana: String,
        han_kana: String,
    ) -> std::result::Result<(), IngestionError> {
        let line = record.line;

        if record.branch_code.is_empty() {
            return Err(IngestionError::MissingField {
                line,
                field: "branch_code",
            });
        }
        if !is_exact_code(&record.branch_code, BRANCH_CODE_WIDTH) {
            return Err(IngestionError::MalformedCode {
                line,
                field: "branch_code",
                value: record.branch_code,
            });
        }

        let Some(&bank_pos) = self.bank_index.get(&record.bank_code) else {
            return Err(IngestionError::UnknownBank {
                line,
                bank_code: record.bank_code,
                branch_code: record.branch_code,
            });
        };

        let Some(flag) = SubBranchFlag::parse(&record.sub_branch) else {
            return Err(IngestionError::InvalidSubBranchFlag {
                line,
                value: record.sub_branch,
            });
        };

        let key = (record.bank_code, record.branch_code);
        let entry = BranchEntry {
            branch_code: key.1.clone(),
            name: record.name,
            zen_kana,
            han_kana,
            sub_branch: flag,
            sub_branches: Vec::new(),
        };
        let branches = &mut self.banks[bank_pos].branches;

        match flag {
            SubBranchFlag::Primary => {
                if self.branch_index.contains_key(&key) {
                    return Err(IngestionError::DuplicateBranch {
                        line,
                        bank_code: key.0,
                        branch_code: key.1,
                    });
                }
                self.branch_index.insert(key, branches.len());
                branches.push(entry);
            }
            SubBranchFlag::SubOffice => {
                let Some(&branch_pos) = self.branch_index.get(&key) else {
                    return Err(IngestionError::UnknownPrimaryBranch {
                        line,
                        bank_code: key.0,
                        branch_code: key.1,
                    });
                };
                branches[branch_pos].sub_branches.push(entry);
            }
        }

        Ok(())
    }

    /// Resolve full names and hand back the finished hierarchy.
    pub fn finish(mut self) -> Hierarchy {
        for code in exception_bank_codes() {
            if !self.bank_index.contains_key(code) {
                warn!(bank_code = code, "full-name exception names a bank missing from the export");
            }
        }

        for bank in &mut self.banks {
            let resolution = resolve_full_name(&bank.bank_code, &bank.name);
            debug!(bank_code = %bank.bank_code, rule = ?resolution.rule, "resolved full name");
            bank.full_name = resolution.full_name;
        }

        let hierarchy = Hierarchy { banks: self.banks };
        info!(
            banks = hierarchy.bank_count(),
            branches = hierarchy.branch_count(),
            "rebuilt bank hierarchy"
        );
        hierarchy
    }
}

/// Rebuild the hierarchy from records in source order. Any inconsistency
/// aborts the whole build.
pub fn build_hierarchy<I>(records: I) -> std::result::Result<Hierarchy, IngestionError>
where
    I: IntoIterator<Item = FlatRecord>,
{
    let mut builder = HierarchyBuilder::new();
    for record in records {
        builder.push(record)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_records;

    #[test]
    fn test_build_sample_hierarchy() {
        let hierarchy = build_hierarchy(sample_records()).unwrap();

        let mizuho = hierarchy.bank("0001").unwrap();
        assert_eq!(mizuho.name, "みずほ");
        assert_eq!(mizuho.full_name, "みずほ銀行");
        assert_eq!(mizuho.zen_kana, "ミズホ");
        assert_eq!(mizuho.han_kana, "ﾐｽﾞﾎ");
        assert_eq!(mizuho.branches.len(), 3);

        let honten = mizuho.branch("001").unwrap();
        assert_eq!(honten.name, "東京営業部");
        assert_eq!(honten.sub_branch, SubBranchFlag::Primary);
    }

    #[test]
    fn test_sub_offices_attach_to_primary() {
        let hierarchy = build_hierarchy(sample_records()).unwrap();
        let mizuho = hierarchy.bank("0001").unwrap();

        let parent = mizuho.branch("004").unwrap();
        assert_eq!(parent.sub_branches.len(), 2);
        assert_eq!(parent.sub_branches[0].name, "羽田空港出張所");
        assert_eq!(parent.sub_branches[0].sub_branch, SubBranchFlag::SubOffice);
        assert_eq!(parent.sub_branches[1].name, "大手町出張所");

        // Sub-offices are not separate primary entries
        assert_eq!(mizuho.branches.iter().filter(|b| b.branch_code == "004").count(), 1);
    }

    #[test]
    fn test_full_name_rules_applied() {
        let hierarchy = build_hierarchy(sample_records()).unwrap();

        assert_eq!(hierarchy.bank("0401").unwrap().full_name, "シティバンク、エヌ・エイ");
        assert_eq!(hierarchy.bank("2004").unwrap().full_name, "商工組合中央金庫");
        assert_eq!(hierarchy.bank("1001").unwrap().full_name, "北海道信用金庫");
        assert_eq!(hierarchy.bank("9900").unwrap().full_name, "ゆうちょ銀行");
    }

    #[test]
    fn test_han_kana_trimmed() {
        let records = vec![FlatRecord::bank(1, "0001", " ﾐｽﾞﾎ  ", "みずほ")];
        let hierarchy = build_hierarchy(records).unwrap();
        let bank = hierarchy.bank("0001").unwrap();
        assert_eq!(bank.han_kana, "ﾐｽﾞﾎ");
        assert_eq!(bank.zen_kana, "ミズホ");
    }

    #[test]
    fn test_branch_before_bank_fails() {
        let records = vec![FlatRecord::branch(1, "0001", "001", "ﾎﾝﾃﾝ", "本店", "1")];
        let err = build_hierarchy(records).unwrap_err();
        assert!(matches!(err, IngestionError::UnknownBank { line: 1, .. }));
    }

    #[test]
    fn test_sub_office_before_primary_fails() {
        let records = vec![
            FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ"),
            FlatRecord::branch(2, "0001", "004", "ﾊﾈﾀﾞｸｳｺｳ", "羽田空港出張所", "2"),
            FlatRecord::branch(3, "0001", "004", "ﾏﾙﾉｳﾁ", "丸の内", "1"),
        ];
        let err = build_hierarchy(records).unwrap_err();
        assert_eq!(
            err,
            IngestionError::UnknownPrimaryBranch {
                line: 2,
                bank_code: "0001".to_string(),
                branch_code: "004".to_string(),
            }
        );
    }

    #[test]
    fn test_sub_office_under_other_bank_fails() {
        let records = vec![
            FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ"),
            FlatRecord::branch(2, "0001", "004", "ﾏﾙﾉｳﾁ", "丸の内", "1"),
            FlatRecord::bank(3, "0005", "ﾐﾂﾋﾞｼﾕ-ｴﾌｼﾞｴｲ", "三菱ＵＦＪ"),
            FlatRecord::branch(4, "0005", "004", "ﾊﾈﾀﾞｸｳｺｳ", "羽田空港出張所", "2"),
        ];
        assert!(matches!(
            build_hierarchy(records),
            Err(IngestionError::UnknownPrimaryBranch { line: 4, .. })
        ));
    }

    #[test]
    fn test_invalid_flags_fail() {
        let records = vec![
            FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ"),
            FlatRecord::branch(2, "0001", "001", "ﾎﾝﾃﾝ", "本店", "3"),
        ];
        assert_eq!(
            build_hierarchy(records).unwrap_err(),
            IngestionError::InvalidSubBranchFlag {
                line: 2,
                value: "3".to_string(),
            }
        );

        let mut record = FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ");
        record.branch_flag = "9".to_string();
        assert!(matches!(
            build_hierarchy(vec![record]),
            Err(IngestionError::InvalidRecordType { line: 1, .. })
        ));
    }

    #[test]
    fn test_duplicates_fail() {
        let records = vec![
            FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ"),
            FlatRecord::bank(2, "0001", "ﾐｽﾞﾎ", "みずほ"),
        ];
        assert!(matches!(
            build_hierarchy(records),
            Err(IngestionError::DuplicateBank { line: 2, .. })
        ));

        let records = vec![
            FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ"),
            FlatRecord::branch(2, "0001", "001", "ﾎﾝﾃﾝ", "本店", "1"),
            FlatRecord::branch(3, "0001", "001", "ﾎﾝﾃﾝ", "本店", "1"),
        ];
        assert!(matches!(
            build_hierarchy(records),
            Err(IngestionError::DuplicateBranch { line: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_codes_fail() {
        let records = vec![FlatRecord::bank(1, "1", "ﾐｽﾞﾎ", "みずほ")];
        assert!(matches!(
            build_hierarchy(records),
            Err(IngestionError::MalformedCode { field: "bank_code", .. })
        ));

        let records = vec![
            FlatRecord::bank(1, "0001", "ﾐｽﾞﾎ", "みずほ"),
            FlatRecord::branch(2, "0001", "", "ﾎﾝﾃﾝ", "本店", "1"),
        ];
        assert!(matches!(
            build_hierarchy(records),
            Err(IngestionError::MissingField { field: "branch_code", .. })
        ));
    }

    #[test]
    fn test_json_document_shape() {
        let hierarchy = build_hierarchy(sample_records()).unwrap();
        let json = hierarchy.to_json_pretty().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(doc["0001"]["full_name"], "みずほ銀行");
        assert_eq!(doc["0001"]["branches"]["001"]["zen_kana"], "トウキヨウエイギヨウブ");
        assert_eq!(doc["0001"]["branches"]["004"]["sub_branch"], "1");
        assert_eq!(
            doc["0001"]["branches"]["004"]["sub_branches"][0]["name"],
            "羽田空港出張所"
        );
        assert!(doc["0001"]["branches"]["001"].get("sub_branches").is_none());

        // Banks keep source order in the document
        let first_key = json.lines().nth(1).unwrap().trim();
        assert!(first_key.starts_with("\"0001\""), "{first_key}");
        assert!(json.contains("みずほ"), "document is written as UTF-8, not escaped");
    }
}
