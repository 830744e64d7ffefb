// カナ - Half-width / full-width kana handling
//
// Readings arrive as half-width katakana (ﾐｽﾞﾎ) and are stored twice:
// as supplied and converted to full-width (ミズホ). Search keys may be typed
// in either script, or in hiragana, so they are folded before matching.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// ============================================================================
// TABLES
// ============================================================================

/// Full-width equivalents of U+FF61..=U+FF9F, in code point order.
const HALF_WIDTH_KANA: [char; 63] = [
    '。', '「', '」', '、', '・', 'ヲ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ャ', 'ュ', 'ョ', 'ッ', 'ー',
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ',
    'タ', 'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ',
    'マ', 'ミ', 'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ', 'ル', 'レ', 'ロ', 'ワ', 'ン',
    '゛', '゜',
];

const HALF_WIDTH_FIRST: u32 = 0xFF61;
const HALF_WIDTH_VOICED_MARK: char = 'ﾞ';
const HALF_WIDTH_SEMI_VOICED_MARK: char = 'ﾟ';

/// Base kana → kana with voiced mark (ﾞ).
const VOICED: &[(char, char)] = &[
    ('ウ', 'ヴ'), ('カ', 'ガ'), ('キ', 'ギ'), ('ク', 'グ'), ('ケ', 'ゲ'), ('コ', 'ゴ'),
    ('サ', 'ザ'), ('シ', 'ジ'), ('ス', 'ズ'), ('セ', 'ゼ'), ('ソ', 'ゾ'),
    ('タ', 'ダ'), ('チ', 'ヂ'), ('ツ', 'ヅ'), ('テ', 'デ'), ('ト', 'ド'),
    ('ハ', 'バ'), ('ヒ', 'ビ'), ('フ', 'ブ'), ('ヘ', 'ベ'), ('ホ', 'ボ'),
    ('ワ', 'ヷ'), ('ヲ', 'ヺ'),
];

/// Base kana → kana with semi-voiced mark (ﾟ).
const SEMI_VOICED: &[(char, char)] = &[
    ('ハ', 'パ'), ('ヒ', 'ピ'), ('フ', 'プ'), ('ヘ', 'ペ'), ('ホ', 'ポ'),
];

/// Search folding: hiragana → katakana, small kana → large kana.
/// The export spells readings with large kana only (ユウチヨ, not ユウチョ).
const SEARCH_FOLD: &[(char, char)] = &[
    ('ぁ', 'ア'), ('あ', 'ア'), ('ぃ', 'イ'), ('い', 'イ'), ('ぅ', 'ウ'), ('う', 'ウ'), ('ぇ', 'エ'), ('え', 'エ'),
    ('ぉ', 'オ'), ('お', 'オ'), ('か', 'カ'), ('が', 'ガ'), ('き', 'キ'), ('ぎ', 'ギ'), ('く', 'ク'), ('ぐ', 'グ'),
    ('け', 'ケ'), ('げ', 'ゲ'), ('こ', 'コ'), ('ご', 'ゴ'), ('さ', 'サ'), ('ざ', 'ザ'), ('し', 'シ'), ('じ', 'ジ'),
    ('す', 'ス'), ('ず', 'ズ'), ('せ', 'セ'), ('ぜ', 'ゼ'), ('そ', 'ソ'), ('ぞ', 'ゾ'), ('た', 'タ'), ('だ', 'ダ'),
    ('ち', 'チ'), ('ぢ', 'ヂ'), ('っ', 'ツ'), ('つ', 'ツ'), ('づ', 'ヅ'), ('て', 'テ'), ('で', 'デ'), ('と', 'ト'),
    ('ど', 'ド'), ('な', 'ナ'), ('に', 'ニ'), ('ぬ', 'ヌ'), ('ね', 'ネ'), ('の', 'ノ'), ('は', 'ハ'), ('ば', 'バ'),
    ('ぱ', 'パ'), ('ひ', 'ヒ'), ('び', 'ビ'), ('ぴ', 'ピ'), ('ふ', 'フ'), ('ぶ', 'ブ'), ('ぷ', 'プ'), ('へ', 'ヘ'),
    ('べ', 'ベ'), ('ぺ', 'ペ'), ('ほ', 'ホ'), ('ぼ', 'ボ'), ('ぽ', 'ポ'), ('ま', 'マ'), ('み', 'ミ'), ('む', 'ム'),
    ('め', 'メ'), ('も', 'モ'), ('ゃ', 'ヤ'), ('や', 'ヤ'), ('ゅ', 'ユ'), ('ゆ', 'ユ'), ('ょ', 'ヨ'), ('よ', 'ヨ'),
    ('ら', 'ラ'), ('り', 'リ'), ('る', 'ル'), ('れ', 'レ'), ('ろ', 'ロ'), ('わ', 'ワ'), ('を', 'オ'), ('ん', 'ン'),
    ('ゎ', 'ワ'), ('ゐ', 'イ'), ('ゑ', 'エ'), ('ゕ', 'カ'), ('ゖ', 'ケ'), ('ゔ', 'ヴ'), ('ァ', 'ア'), ('ィ', 'イ'),
    ('ゥ', 'ウ'), ('ェ', 'エ'), ('ォ', 'オ'), ('ッ', 'ツ'), ('ャ', 'ヤ'), ('ュ', 'ユ'), ('ョ', 'ヨ'), ('ヮ', 'ワ'),
    ('ヵ', 'カ'), ('ヶ', 'ケ'), ('ヰ', 'イ'), ('ヱ', 'エ'), ('ヲ', 'オ'),
];

static SEARCH_FOLD_MAP: Lazy<HashMap<char, char>> =
    Lazy::new(|| SEARCH_FOLD.iter().copied().collect());

static RE_FULL_KATAKANA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\x{30A1}-\x{30FF}]+$").unwrap());

// ============================================================================
// CONVERSIONS
// ============================================================================

fn half_width_kana(c: char) -> Option<char> {
    let offset = (c as u32).checked_sub(HALF_WIDTH_FIRST)?;
    HALF_WIDTH_KANA.get(offset as usize).copied()
}

fn compose(base: char, table: &[(char, char)]) -> Option<char> {
    table.iter().find(|(from, _)| *from == base).map(|(_, to)| *to)
}

/// Printable ASCII and space to their full-width forms.
fn full_width_ascii(c: char) -> char {
    match c {
        ' ' => '\u{3000}',
        '!'..='~' => char::from_u32(c as u32 + 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

/// Convert half-width kana (and ASCII) to full-width.
///
/// A trailing half-width voiced or semi-voiced mark merges into the kana
/// before it when a composed form exists (`ｶﾞ` → `ガ`); otherwise the mark is
/// kept as its standalone full-width form. Anything else passes through, so
/// the conversion is a no-op on text that is already full-width.
pub fn han_to_zen(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let Some(full) = half_width_kana(c) else {
            out.push(full_width_ascii(c));
            continue;
        };

        let composed = match chars.peek() {
            Some(&HALF_WIDTH_VOICED_MARK) => compose(full, VOICED),
            Some(&HALF_WIDTH_SEMI_VOICED_MARK) => compose(full, SEMI_VOICED),
            _ => None,
        };

        match composed {
            Some(kana) => {
                chars.next();
                out.push(kana);
            }
            None => out.push(full),
        }
    }

    out
}

/// Normalize a user-supplied search key: full-width, katakana, large kana.
pub fn fold_search_key(key: &str) -> String {
    han_to_zen(key)
        .chars()
        .map(|c| SEARCH_FOLD_MAP.get(&c).copied().unwrap_or(c))
        .collect()
}

/// True when every character is in the full-width katakana block.
/// Empty strings are not katakana.
pub fn is_full_katakana(text: &str) -> bool {
    RE_FULL_KATAKANA.is_match(text)
}

// ============================================================================
// SEARCH ROUTING
// ============================================================================

/// Which column a search key is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    /// Folded reading, matched against `zen_kana`.
    Reading(String),
    /// Key as typed, matched against `name`.
    Name(String),
}

impl SearchKey {
    pub fn route(key: &str) -> Self {
        let folded = fold_search_key(key);
        if is_full_katakana(&folded) {
            SearchKey::Reading(folded)
        } else {
            SearchKey::Name(key.to_string())
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SearchKey::Reading(_) => "zen_kana",
            SearchKey::Name(_) => "name",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SearchKey::Reading(text) | SearchKey::Name(text) => text,
        }
    }
}
