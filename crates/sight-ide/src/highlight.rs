use sight_syntax::SyntaxKind::{self, *};
use sight_syntax::{DEPTH_CYCLE, SyntaxToken, SyntaxTree};
use text_size::TextRange;

/// Highlight class of a token, named after editor capture conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capture {
    Comment,
    String,
    /// A compound string at depth 1 to 6.
    CompoundString(usize),
    /// A local macro reference at depth 1 to 6.
    LocalMacro(usize),
    /// A global macro reference.
    Variable,
    Type,
    Keyword,
    Number,
    Builtin,
    Operator,
    /// The name of a command or program.
    Function,
}

const COMPOUND_STRING_CAPTURES: [&str; DEPTH_CYCLE] = [
    "string.depth.1",
    "string.depth.2",
    "string.depth.3",
    "string.depth.4",
    "string.depth.5",
    "string.depth.6",
];

const LOCAL_MACRO_CAPTURES: [&str; DEPTH_CYCLE] = [
    "variable.macro.local.depth.1",
    "variable.macro.local.depth.2",
    "variable.macro.local.depth.3",
    "variable.macro.local.depth.4",
    "variable.macro.local.depth.5",
    "variable.macro.local.depth.6",
];

impl Capture {
    pub fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::CompoundString(depth) => {
                COMPOUND_STRING_CAPTURES[depth.saturating_sub(1) % DEPTH_CYCLE]
            }
            Self::LocalMacro(depth) => LOCAL_MACRO_CAPTURES[depth.saturating_sub(1) % DEPTH_CYCLE],
            Self::Variable => "variable",
            Self::Type => "type",
            Self::Keyword => "keyword",
            Self::Number => "number",
            Self::Builtin => "constant.builtin",
            Self::Operator => "operator",
            Self::Function => "function",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub range: TextRange,
    pub capture: Capture,
}

/// Classifies every token of `tree`, in document order. Adjacent tokens with
/// the same capture are merged into one range.
pub fn highlight(tree: &SyntaxTree) -> Vec<HighlightRange> {
    let mut ranges: Vec<HighlightRange> = Vec::new();

    for token in tree.root().tokens() {
        let Some(capture) = capture(token) else {
            continue;
        };
        let range = token.text_range();
        match ranges.last_mut() {
            Some(last) if last.capture == capture && last.range.end() == range.start() => {
                last.range = last.range.cover(range);
            }
            _ => ranges.push(HighlightRange { range, capture }),
        }
    }

    ranges
}

fn capture(token: SyntaxToken<'_>) -> Option<Capture> {
    let kind = token.kind();
    if kind.is_comment() {
        return Some(Capture::Comment);
    }
    if matches!(kind, WHITESPACE | NEWLINE | EOF | MATA_CONTENT) {
        return None;
    }

    if let Some(capture) = enclosing_delimiter(token) {
        return Some(capture);
    }

    match kind {
        TYPE_KEYWORD => Some(Capture::Type),
        kind if kind.is_keyword() => Some(Capture::Keyword),
        NUMBER | MISSING_VALUE => Some(Capture::Number),
        BUILTIN_VARIABLE => Some(Capture::Builtin),
        OPERATOR => Some(Capture::Operator),
        IDENT if token.parent().kind() == NAME => name_capture(token),
        _ => None,
    }
}

/// Capture from the innermost string or macro node around `token`.
fn enclosing_delimiter(token: SyntaxToken<'_>) -> Option<Capture> {
    let node = token.parent_ancestors().find(|node| is_delimited(node.kind()))?;
    let kind = node.kind();
    let capture = match kind {
        DOUBLE_STRING => Capture::String,
        GLOBAL_MACRO => Capture::Variable,
        _ if kind.is_compound_string() => Capture::CompoundString(kind.depth()?),
        _ => Capture::LocalMacro(kind.depth()?),
    };
    Some(capture)
}

fn is_delimited(kind: SyntaxKind) -> bool {
    matches!(kind, DOUBLE_STRING | GLOBAL_MACRO)
        || kind.is_compound_string()
        || kind.is_local_macro()
}

/// Command and program names are functions; names being defined are not.
fn name_capture(token: SyntaxToken<'_>) -> Option<Capture> {
    let owner = token.parent().parent()?;
    matches!(owner.kind(), COMMAND | PROGRAM_DEFINITION).then_some(Capture::Function)
}
