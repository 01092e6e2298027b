use sight_errors::DiagnosticKind;
use sight_syntax::SyntaxKind::*;
use sight_tokenizer::LexMode;

use super::blocks::{mata_block, program_definition};
use super::{argument, arguments, name};
use crate::parser::{Parser, WORDS};

const PROGRAM_KEYWORDS: &[&str] = &["program", "prog", "progr", "progra"];
/// `program drop|dir|list` manage programs rather than define one.
const PROGRAM_SUBCOMMANDS: &[&str] = &["drop", "dir", "list"];
const LOCAL_KEYWORDS: &[&str] = &["local", "loc"];
const GLOBAL_KEYWORDS: &[&str] = &["global", "gl"];
const TEMP_KEYWORDS: &[&str] = &["tempvar", "tempname", "tempfile"];
const PREFIX_KEYWORDS: &[&str] =
    &["by", "bysort", "bys", "quietly", "qui", "noisily", "noi", "capture", "cap", "sortpreserve"];

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        line(p);
    }

    p.advance_eof();
    m.complete(p, SOURCE_FILE);
}

/// A bare line terminator, or statements followed by one.
pub(crate) fn line(p: &mut Parser<'_>) {
    if p.at(NEWLINE) {
        p.advance();
        return;
    }

    loop {
        let after_block_comment = p.at(BLOCK_COMMENT);
        statement(p);
        if !after_block_comment || p.at_end_of_line() {
            break;
        }
    }

    end_of_line(p);
}

fn end_of_line(p: &mut Parser<'_>) {
    trailing_comments(p);
    if !p.at_end_of_line() {
        let m = p.start();
        p.error(DiagnosticKind::StructuralError, "expected end of line");
        while !p.at_end_of_line() {
            argument(p);
        }
        m.complete(p, ERROR);
    }
    p.eat(NEWLINE);
}

fn statement(p: &mut Parser<'_>) {
    match p.peek_kind() {
        LINE_COMMENT | CONTINUATION_COMMENT | STAR_COMMENT | BLOCK_COMMENT => comment(p),
        RIGHT_BRACE => block_close(p),
        _ if p.at_word(PROGRAM_KEYWORDS) && !at_program_subcommand(p) => program_definition(p),
        _ if p.at_word(&["mata"]) => mata_block(p),
        _ if p.at_word(LOCAL_KEYWORDS) || p.at_word(GLOBAL_KEYWORDS) => macro_definition(p),
        _ if p.at_word(TEMP_KEYWORDS) => temp_definition(p),
        _ if p.at_word(&["end"]) => {
            let m = p.start();
            p.error(DiagnosticKind::StructuralError, "`end` without an open program");
            p.advance_as(END_KW, LexMode::Statement);
            trailing_comments(p);
            m.complete(p, ERROR);
        }
        _ => command(p),
    }
}

fn at_program_subcommand(p: &Parser<'_>) -> bool {
    let rest = p.text_after_peek().trim_start_matches([' ', '\t']);
    let word_len =
        rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(rest.len());
    PROGRAM_SUBCOMMANDS.contains(&&rest[..word_len])
}

fn comment(p: &mut Parser<'_>) {
    let m = p.start();
    argument(p);
    m.complete(p, COMMENT);
}

/// `}` closing a brace block, with whatever follows it (`} else {`).
fn block_close(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    arguments(p);
    m.complete(p, BLOCK_CLOSE);
}

/// `local name value...` and `global name value...`.
fn macro_definition(p: &mut Parser<'_>) {
    let m = p.start();
    let keyword = if p.at_word(LOCAL_KEYWORDS) { LOCAL_KW } else { GLOBAL_KW };
    p.advance_as(keyword, LexMode::Statement);
    name(p, "expected a macro name");
    arguments(p);
    m.complete(p, MACRO_DEFINITION);
}

/// `tempvar`, `tempname` and `tempfile` followed by one or more names.
fn temp_definition(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance_as(TEMP_KW, LexMode::Statement);
    if !WORDS.contains(p.peek_kind()) {
        p.error(DiagnosticKind::StructuralError, "expected at least one name");
    }
    while WORDS.contains(p.peek_kind()) {
        name(p, "expected a name");
    }
    trailing_comments(p);
    m.complete(p, MACRO_DEFINITION);
}

fn command(p: &mut Parser<'_>) {
    let m = p.start();

    while p.at_word(PREFIX_KEYWORDS) && prefix_applies(p) {
        let prefix = p.start();
        p.advance_as(PREFIX_KW, LexMode::Statement);
        p.eat(COLON);
        prefix.complete(p, PREFIX);
    }

    match p.peek_kind() {
        kind if WORDS.contains(kind) => {
            name(p, "expected a command name");
        }
        UNKNOWN => argument(p),
        _ => {
            let error = p.start();
            p.error(DiagnosticKind::StructuralError, "expected a command name");
            argument(p);
            error.complete(p, ERROR);
        }
    }

    arguments(p);
    m.complete(p, COMMAND);
}

/// A prefix keyword only modifies a command when one follows it; otherwise it
/// is the command itself (`quietly {`).
fn prefix_applies(p: &Parser<'_>) -> bool {
    let rest = p.text_after_peek().trim_start_matches([' ', '\t']);
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim_start_matches([' ', '\t']);
    rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

/// Comments after the last meaningful token of a statement.
pub(crate) fn trailing_comments(p: &mut Parser<'_>) {
    while matches!(p.peek_kind(), LINE_COMMENT | CONTINUATION_COMMENT | BLOCK_COMMENT) {
        argument(p);
    }
}
