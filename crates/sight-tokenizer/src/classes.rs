//! Word classes recognised by the tokenizer.

use sight_syntax::SyntaxKind::{self, *};

const BUILTIN_VARIABLES: &[&str] = &[
    "_n", "_N", "_b", "_coef", "_cons", "_rc", "_se", "_pi", "_skip", "_dup", "_newline",
    "_column", "_continue", "_request", "_char",
];

const CONTROL_KEYWORDS: &[&str] =
    &["if", "else", "foreach", "forvalues", "forv", "while", "continue", "break", "end"];

const TYPE_KEYWORDS: &[&str] = &["byte", "int", "long", "float", "double", "strL"];

/// Largest width accepted by a sized `strN` storage type.
const MAX_STR_WIDTH: u16 = 2045;

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Classifies a complete identifier-shaped word.
pub fn classify_word(word: &str) -> SyntaxKind {
    if BUILTIN_VARIABLES.contains(&word) {
        BUILTIN_VARIABLE
    } else if CONTROL_KEYWORDS.contains(&word) {
        CONTROL_KEYWORD
    } else if TYPE_KEYWORDS.contains(&word) || is_sized_string_type(word) {
        TYPE_KEYWORD
    } else {
        IDENT
    }
}

/// `str1` through `str2045`, without leading zeros.
fn is_sized_string_type(word: &str) -> bool {
    let Some(width) = word.strip_prefix("str") else {
        return false;
    };
    if width.is_empty() || width.starts_with('0') || !width.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    width.parse::<u16>().is_ok_and(|width| width <= MAX_STR_WIDTH)
}
