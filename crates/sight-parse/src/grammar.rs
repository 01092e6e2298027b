use sight_errors::DiagnosticKind;
use sight_syntax::SyntaxKind::*;
use sight_tokenizer::{LexMode, is_terminated_block_comment};

use crate::parser::{Parser, WORDS};

mod blocks;
mod delimited;
pub(crate) mod statements;

/// The name field of a definition or command: any word, stored as `IDENT`
/// inside a `NAME` node.
pub(crate) fn name(p: &mut Parser<'_>, message: &str) -> bool {
    if WORDS.contains(p.peek_kind()) {
        let m = p.start();
        p.advance_as(IDENT, LexMode::Statement);
        m.complete(p, NAME);
        true
    } else {
        p.error(DiagnosticKind::StructuralError, message);
        false
    }
}

/// Free-form arguments up to the end of the line.
pub(crate) fn arguments(p: &mut Parser<'_>) {
    while !p.at_end_of_line() {
        argument(p);
    }
}

fn argument(p: &mut Parser<'_>) {
    match p.peek_kind() {
        DQUOTE => delimited::double_string(p, LexMode::Statement),
        COMPOUND_OPEN => delimited::compound_string(p, LexMode::Statement),
        BACKTICK => delimited::local_macro(p, LexMode::Statement),
        DOLLAR => delimited::global_macro(p, LexMode::Statement),
        BLOCK_COMMENT if !is_terminated_block_comment(p.peek_text()) => {
            p.error_and_bump(DiagnosticKind::UnterminatedConstruct, "unterminated block comment");
        }
        UNKNOWN => p.error_and_bump(DiagnosticKind::LexError, "unexpected character"),
        _ => p.advance(),
    }
}
