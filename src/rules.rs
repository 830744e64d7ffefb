// 🏷️ Naming Rules - Rules as Data
// Bank full-name exceptions, abbreviation suffixes and branch display names

// ============================================================================
// TABLES
// ============================================================================

/// The five largest institutions, returned by `Bank::major_banks`.
pub const MAJOR_BANK_CODES: &[&str] = &["0001", "0005", "0009", "0010", "0017"];

/// Banks whose legal name is their short name verbatim.
pub const SAME_NAME_BANK_CODES: &[&str] = &[
    "0401", // シティバンク、エヌ・エイ
    "0403", // バンク・オブ・アメリカ・エヌ・エイ
    "0429", // バンクネガラインドネシア
    "0482", // アイエヌジー　バンク　エヌ・ヴィ
    "0484", // ナショナル・オーストラリア・バンク・リミテッド
    "0617", // フィリピン・ナショナル・バンク
    "1000", // 信金中央金庫
    "2213", // 整理回収機構
];

/// Hand-authored full names that cannot be derived from the short name.
pub const EXPLICIT_FULL_NAMES: &[(&str, &str)] = &[
    ("2004", "商工組合中央金庫"),         // 商工中金
    ("2010", "全国信用協同組合連合会"),   // 全信組連
    ("3000", "農林中央金庫"),             // 農林中金
    ("3771", "秋田たかのす農業協同組合"), // 秋田たかのす
];

/// Category abbreviations, checked in order; first suffix match wins.
pub const ABBREVIATED_SUFFIXES: &[(&str, &str)] = &[
    ("農協", "農業協同組合"),
    ("漁協", "漁業協同組合"),
    ("信漁連", "信用漁業協同組合連合会"),
    ("信組", "信用組合"),
    ("信連", "信用連合会"),
    ("労金", "労働金庫"),
    ("信金", "信用金庫"),
];

/// Appended when no other rule applies.
pub const BANK_SUFFIX: &str = "銀行";

/// Banks whose branch names are used as-is.
pub const UNSUFFIXED_BRANCH_BANK_CODES: &[&str] = &["9900"];

/// A branch name containing this is a head office (本店営業部 etc).
pub const HEAD_OFFICE_MARKER: &str = "営業";

/// Branch names already ending in one of these are complete.
pub const COMPLETE_BRANCH_SUFFIXES: &[&str] = &["店", "出張所"];

pub const BRANCH_SUFFIX: &str = "支店";

// ============================================================================
// BANK FULL NAME
// ============================================================================

/// Which rule produced a bank's full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullNameRule {
    SameName,
    Explicit,
    Suffix(&'static str),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullNameResolution {
    pub full_name: String,
    pub rule: FullNameRule,
}

/// Resolve the legal name of a bank. Rules apply in priority order:
/// same-name list, explicit table, suffix expansion, then `name + 銀行`.
pub fn resolve_full_name(bank_code: &str, name: &str) -> FullNameResolution {
    if SAME_NAME_BANK_CODES.contains(&bank_code) {
        return FullNameResolution {
            full_name: name.to_string(),
            rule: FullNameRule::SameName,
        };
    }

    if let Some((_, full_name)) = EXPLICIT_FULL_NAMES.iter().find(|(code, _)| *code == bank_code) {
        return FullNameResolution {
            full_name: full_name.to_string(),
            rule: FullNameRule::Explicit,
        };
    }

    for &(abbr, expanded) in ABBREVIATED_SUFFIXES {
        if let Some(stem) = name.strip_suffix(abbr) {
            return FullNameResolution {
                full_name: format!("{}{}", stem, expanded),
                rule: FullNameRule::Suffix(abbr),
            };
        }
    }

    FullNameResolution {
        full_name: format!("{}{}", name, BANK_SUFFIX),
        rule: FullNameRule::Default,
    }
}

/// Bank codes named by the exception tables, for checking them against data.
pub fn exception_bank_codes() -> impl Iterator<Item = &'static str> {
    SAME_NAME_BANK_CODES
        .iter()
        .copied()
        .chain(EXPLICIT_FULL_NAMES.iter().map(|(code, _)| *code))
}

// ============================================================================
// BRANCH FULL NAME
// ============================================================================

/// Official display name of a branch. `None` when there is no name.
pub fn branch_full_name(bank_code: &str, branch_name: &str) -> Option<String> {
    if branch_name.is_empty() {
        return None;
    }

    let complete = UNSUFFIXED_BRANCH_BANK_CODES.contains(&bank_code)
        || branch_name.contains(HEAD_OFFICE_MARKER)
        || COMPLETE_BRANCH_SUFFIXES
            .iter()
            .any(|suffix| branch_name.ends_with(suffix));

    if complete {
        Some(branch_name.to_string())
    } else {
        Some(format!("{}{}", branch_name, BRANCH_SUFFIX))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_banks() {
        let result = resolve_full_name("1000", "信金中央金庫");
        assert_eq!(result.full_name, "信金中央金庫");
        assert_eq!(result.rule, FullNameRule::SameName);

        let result = resolve_full_name("0401", "シティバンク、エヌ・エイ");
        assert_eq!(result.full_name, "シティバンク、エヌ・エイ");
    }

    #[test]
    fn test_explicit_full_names() {
        let result = resolve_full_name("2004", "商工中金");
        assert_eq!(result.full_name, "商工組合中央金庫");
        assert_eq!(result.rule, FullNameRule::Explicit);

        assert_eq!(resolve_full_name("3771", "秋田たかのす").full_name, "秋田たかのす農業協同組合");
    }

    #[test]
    fn test_suffix_expansion() {
        assert_eq!(resolve_full_name("1001", "北海道信金").full_name, "北海道信用金庫");
        assert_eq!(resolve_full_name("2011", "北央信組").full_name, "北央信用組合");
        assert_eq!(resolve_full_name("2951", "中央労金").full_name, "中央労働金庫");
        assert_eq!(resolve_full_name("3001", "北海道信連").full_name, "北海道信用連合会");
        assert_eq!(resolve_full_name("9450", "北海道信漁連").full_name, "北海道信用漁業協同組合連合会");
        assert_eq!(resolve_full_name("3056", "道央農協").full_name, "道央農業協同組合");

        let result = resolve_full_name("9500", "東日本漁協");
        assert_eq!(result.full_name, "東日本漁業協同組合");
        assert_eq!(result.rule, FullNameRule::Suffix("漁協"));
    }

    #[test]
    fn test_default_bank_suffix() {
        let result = resolve_full_name("0001", "みずほ");
        assert_eq!(result.full_name, "みずほ銀行");
        assert_eq!(result.rule, FullNameRule::Default);
    }

    #[test]
    fn test_branch_full_name() {
        assert_eq!(branch_full_name("0001", "東京営業部").as_deref(), Some("東京営業部"));
        assert_eq!(branch_full_name("0001", "本店").as_deref(), Some("本店"));
        assert_eq!(branch_full_name("0001", "羽田空港出張所").as_deref(), Some("羽田空港出張所"));
        assert_eq!(branch_full_name("0001", "丸の内").as_deref(), Some("丸の内支店"));
        assert_eq!(branch_full_name("9900", "〇一八").as_deref(), Some("〇一八"));
        assert_eq!(branch_full_name("0001", ""), None);
    }

    #[test]
    fn test_major_bank_codes_are_valid() {
        assert_eq!(MAJOR_BANK_CODES.len(), 5);
        for code in MAJOR_BANK_CODES.iter().copied().chain(exception_bank_codes()) {
            assert!(crate::codes::is_exact_code(code, 4), "{code}");
        }
    }
}
