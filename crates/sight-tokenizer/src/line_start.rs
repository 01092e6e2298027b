//! Logical line-start detection.
//!
//! A `*` opens a comment only when nothing but spaces and tabs precede it on
//! its line. The answer depends on the buffer alone, so it can be recomputed
//! from any offset without carrying state between tokens.

use text_size::TextSize;

/// Reports whether only horizontal whitespace lies between the previous line
/// break (or the start of the buffer) and `offset`.
pub fn is_line_start(text: &str, offset: TextSize) -> bool {
    let Some(before) = text.get(..usize::from(offset)) else {
        return false;
    };
    match before.trim_end_matches([' ', '\t']).chars().next_back() {
        None => true,
        Some(c) => c == '\n' || c == '\r',
    }
}
