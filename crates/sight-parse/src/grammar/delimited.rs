//! Strings and macro references.
//!
//! Local macros and compound strings nest without bound. Open delimiters are
//! tracked on an explicit stack of frames, each carrying its family, its
//! nesting depth and the mode to resume in once it closes. Depth labels cycle
//! through six kinds, so any nesting level gets one.

use sight_errors::DiagnosticKind;
use sight_syntax::SyntaxKind::{self, *};
use sight_tokenizer::LexMode;
use text_size::TextRange;

use crate::parser::{Marker, Parser};

/// `"..."`, closed at the next unescaped `"` on the same line.
pub(crate) fn double_string(p: &mut Parser<'_>, outer: LexMode) {
    debug_assert_eq!(p.peek_kind(), DQUOTE);
    let open = p.peek_range();
    let m = p.start();
    p.advance_in(LexMode::DoubleString);

    loop {
        match p.peek_kind() {
            DQUOTE => {
                p.advance_in(outer);
                m.complete(p, DOUBLE_STRING);
                return;
            }
            DOLLAR => global_macro(p, LexMode::DoubleString),
            NEWLINE | EOF => {
                return unterminated(p, m, DOUBLE_STRING, open, "unterminated string", outer);
            }
            _ => p.advance_in(LexMode::DoubleString),
        }
    }
}

/// `` `"..."' ``, which may hold further compound strings, double strings and
/// macro references.
pub(crate) fn compound_string(p: &mut Parser<'_>, outer: LexMode) {
    nested(p, Family::CompoundString, outer);
}

/// `` `name' `` and its nested forms such as `` `x`i'' ``.
pub(crate) fn local_macro(p: &mut Parser<'_>, outer: LexMode) {
    nested(p, Family::LocalMacro, outer);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    LocalMacro,
    CompoundString,
}

impl Family {
    fn open(self) -> SyntaxKind {
        match self {
            Family::LocalMacro => BACKTICK,
            Family::CompoundString => COMPOUND_OPEN,
        }
    }

    fn close(self) -> SyntaxKind {
        match self {
            Family::LocalMacro => QUOTE,
            Family::CompoundString => COMPOUND_CLOSE,
        }
    }

    fn mode(self) -> LexMode {
        match self {
            Family::LocalMacro => LexMode::LocalMacro,
            Family::CompoundString => LexMode::CompoundString,
        }
    }

    fn kind(self, depth: usize) -> SyntaxKind {
        match self {
            Family::LocalMacro => SyntaxKind::local_macro(depth),
            Family::CompoundString => SyntaxKind::compound_string(depth),
        }
    }

    fn unterminated_message(self) -> &'static str {
        match self {
            Family::LocalMacro => "unterminated local macro",
            Family::CompoundString => "unterminated compound string",
        }
    }
}

/// An open delimiter waiting for its closing half.
struct Frame {
    family: Family,
    depth: usize,
    open: TextRange,
    marker: Marker,
    outer: LexMode,
}

fn push_frame(
    p: &mut Parser<'_>,
    stack: &mut Vec<Frame>,
    family: Family,
    depth: usize,
    outer: LexMode,
) {
    debug_assert_eq!(p.peek_kind(), family.open());
    let open = p.peek_range();
    let marker = p.start();
    p.advance_in(family.mode());
    stack.push(Frame { family, depth, open, marker, outer });
}

fn nested(p: &mut Parser<'_>, family: Family, outer: LexMode) {
    let mut stack = Vec::new();
    push_frame(p, &mut stack, family, 1, outer);

    while let Some(&Frame { family, depth, .. }) = stack.last() {
        let mode = family.mode();
        match p.peek_kind() {
            kind if kind == family.close() => {
                let Some(frame) = stack.pop() else { break };
                p.advance_in(frame.outer);
                frame.marker.complete(p, family.kind(depth));
            }
            NEWLINE | EOF => {
                let Some(frame) = stack.pop() else { break };
                let message = family.unterminated_message();
                let kind = family.kind(depth);
                unterminated(p, frame.marker, kind, frame.open, message, frame.outer);
            }
            COMPOUND_OPEN if family == Family::CompoundString => {
                push_frame(p, &mut stack, Family::CompoundString, depth + 1, mode);
            }
            BACKTICK => {
                // Inside a compound string the local family starts over.
                let depth = if family == Family::LocalMacro { depth + 1 } else { 1 };
                push_frame(p, &mut stack, Family::LocalMacro, depth, mode);
            }
            DOLLAR => global_macro(p, mode),
            DQUOTE => double_string(p, mode),
            _ => p.advance_in(mode),
        }
    }
}

/// `$name` or `${name}`.
pub(crate) fn global_macro(p: &mut Parser<'_>, outer: LexMode) {
    debug_assert_eq!(p.peek_kind(), DOLLAR);
    let open = p.peek_range();
    let m = p.start();
    p.advance_in(LexMode::GlobalMacro);

    if p.at(IDENT) {
        p.advance_in(outer);
        m.complete(p, GLOBAL_MACRO);
        return;
    }

    if !p.at(LEFT_BRACE) {
        p.error(DiagnosticKind::StructuralError, "expected a global macro name");
        p.relex(outer);
        m.complete(p, GLOBAL_MACRO).precede(p).complete(p, ERROR);
        return;
    }

    p.advance_in(LexMode::GlobalMacro);
    if p.at(IDENT) {
        p.advance_in(LexMode::GlobalMacro);
    } else if !p.at(RIGHT_BRACE) {
        let open = TextRange::new(open.start(), p.peek_range().start());
        return unterminated(p, m, GLOBAL_MACRO, open, "unterminated `${`", outer);
    } else {
        p.error(DiagnosticKind::StructuralError, "expected a global macro name");
    }

    if p.at(RIGHT_BRACE) {
        p.advance_in(outer);
        m.complete(p, GLOBAL_MACRO);
    } else {
        let open = TextRange::new(open.start(), p.peek_range().start());
        unterminated(p, m, GLOBAL_MACRO, open, "unterminated `${`", outer);
    }
}

/// Closes a construct that ran into a line end or the end of input. The node
/// keeps everything consumed so far and is wrapped in `ERROR`.
fn unterminated(
    p: &mut Parser<'_>,
    m: Marker,
    kind: SyntaxKind,
    open: TextRange,
    message: &str,
    outer: LexMode,
) {
    p.error_at(DiagnosticKind::UnterminatedConstruct, message, open);
    p.relex(outer);
    m.complete(p, kind).precede(p).complete(p, ERROR);
}
