// Bank / branch code validation
//
// Codes are accepted as numbers or digit strings ("1", "0001", "０００１", 1)
// and canonicalized to their zero-padded width. Anything that does not fit the
// width after reparsing is rejected.

use crate::error::ValidationError;
use std::fmt;

pub const BANK_CODE_WIDTH: usize = 4;
pub const BRANCH_CODE_WIDTH: usize = 3;

/// Full-width digits (０-９) become ASCII; everything else is left alone.
fn fold_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => char::from(b'0' + (c as u32 - 0xFF10) as u8),
            _ => c,
        })
        .collect()
}

/// Reparse `raw` as a non-negative integer and zero-pad it to `width`.
fn canonicalize(raw: &str, width: usize) -> Option<String> {
    let folded = fold_digits(raw);
    let trimmed = folded.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: u64 = digits.parse().ok()?;
    let code = format!("{:0width$}", value, width = width);
    (code.len() == width).then_some(code)
}

/// Exactly `width` ASCII digits, as the source export writes codes.
pub(crate) fn is_exact_code(raw: &str, width: usize) -> bool {
    raw.len() == width && raw.bytes().all(|b| b.is_ascii_digit())
}

/// 4-digit zero-padded bank code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BankCode(String);

impl BankCode {
    pub fn parse(raw: impl ToString) -> Result<Self, ValidationError> {
        let raw = raw.to_string();
        canonicalize(&raw, BANK_CODE_WIDTH)
            .map(BankCode)
            .ok_or(ValidationError::BankCode(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 3-digit zero-padded branch code, unique within a bank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchCode(String);

impl BranchCode {
    pub fn parse(raw: impl ToString) -> Result<Self, ValidationError> {
        let raw = raw.to_string();
        canonicalize(&raw, BRANCH_CODE_WIDTH)
            .map(BranchCode)
            .ok_or(ValidationError::BranchCode(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_valid_bank_code(raw: impl ToString) -> bool {
    BankCode::parse(raw).is_ok()
}

pub fn is_valid_branch_code(raw: impl ToString) -> bool {
    BranchCode::parse(raw).is_ok()
}
