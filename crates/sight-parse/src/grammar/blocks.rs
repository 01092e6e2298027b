use sight_errors::DiagnosticKind;
use sight_syntax::SyntaxKind::{self, *};
use sight_tokenizer::LexMode;

use super::statements::{line, trailing_comments};
use super::{arguments, name};
use crate::parser::{Marker, Parser};

/// `program [define] name [options]`, a body of statements, and `end`.
pub(crate) fn program_definition(p: &mut Parser<'_>) {
    let open = p.peek_range();
    let m = p.start();
    p.advance_as(PROGRAM_KW, LexMode::Statement);
    if p.at_word(&["define"]) {
        p.advance_as(DEFINE_KW, LexMode::Statement);
    }
    name(p, "expected a program name");
    arguments(p);

    loop {
        match p.peek_kind() {
            EOF => {
                p.error_at(DiagnosticKind::StructuralError, "missing `end` for program", open);
                return unfinished(p, m, PROGRAM_DEFINITION);
            }
            NEWLINE => p.advance(),
            _ if p.at_word(&["end"]) => {
                p.advance_as(END_KW, LexMode::Statement);
                trailing_comments(p);
                break;
            }
            _ => line(p),
        }
    }

    m.complete(p, PROGRAM_DEFINITION);
}

/// `mata` in its braced, multiline and single-line forms.
///
/// Everything between the delimiters is kept as opaque `MATA_CONTENT`.
pub(crate) fn mata_block(p: &mut Parser<'_>) {
    let open = p.peek_range();
    let m = p.start();
    p.advance_as(MATA_KW, LexMode::MataHead);
    if p.at(COLON) {
        p.advance_in(LexMode::MataHead);
    }

    match p.peek_kind() {
        LEFT_BRACE => {
            p.advance_in(LexMode::MataBrace);
            if p.at(MATA_CONTENT) {
                p.advance_in(LexMode::MataBrace);
            }
            if !p.at(RIGHT_BRACE) {
                p.error_at(DiagnosticKind::UnterminatedConstruct, "missing `}` for mata", open);
                p.relex(LexMode::Statement);
                return unfinished(p, m, MATA_BLOCK);
            }
            p.advance();
        }
        NEWLINE | EOF => loop {
            match p.peek_kind() {
                EOF => {
                    p.error_at(DiagnosticKind::StructuralError, "missing `end` for mata", open);
                    return unfinished(p, m, MATA_BLOCK);
                }
                CONTROL_KEYWORD => {
                    p.advance_as(END_KW, LexMode::Statement);
                    trailing_comments(p);
                    break;
                }
                _ => p.advance_in(LexMode::MataLine),
            }
        },
        _ => p.advance(),
    }

    m.complete(p, MATA_BLOCK);
}

/// Completes a block that never saw its terminator and wraps it in `ERROR`.
fn unfinished(p: &mut Parser<'_>, m: Marker, kind: SyntaxKind) {
    m.complete(p, kind).precede(p).complete(p, ERROR);
}
