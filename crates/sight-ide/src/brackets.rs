use sight_syntax::SyntaxKind::{self, *};
use sight_syntax::{SyntaxNode, SyntaxTree};
use text_size::TextRange;

/// Opening and closing delimiter of one balanced pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    pub open: TextRange,
    pub close: TextRange,
}

impl BracketPair {
    /// Returns the other end of the pair when `range` is one of its ends.
    pub fn partner(self, range: TextRange) -> Option<TextRange> {
        if range == self.open {
            Some(self.close)
        } else if range == self.close {
            Some(self.open)
        } else {
            None
        }
    }
}

/// Balanced brackets and closed string and macro delimiters, ordered by the
/// start of the opening delimiter.
///
/// Parentheses, brackets and braces are matched by kind across lines, so a
/// `{` ending a `foreach` line pairs with the `}` that closes the block.
/// Unmatched brackets are skipped.
pub fn bracket_pairs(tree: &SyntaxTree) -> Vec<BracketPair> {
    let root = tree.root();
    let mut pairs = Vec::new();
    let mut open: Vec<(SyntaxKind, TextRange)> = Vec::new();

    for token in root.tokens() {
        let kind = token.kind();
        if let Some(close) = closing(kind) {
            open.push((close, token.text_range()));
        } else if matches!(kind, RIGHT_PAREN | RIGHT_BRACKET | RIGHT_BRACE) {
            if let Some(position) = open.iter().rposition(|&(close, _)| close == kind) {
                let (_, range) = open[position];
                open.truncate(position);
                pairs.push(BracketPair { open: range, close: token.text_range() });
            }
        }
    }

    pairs.extend(root.descendants().filter_map(delimiter_pair));
    pairs.sort_by_key(|pair| pair.open.start());
    pairs
}

fn closing(kind: SyntaxKind) -> Option<SyntaxKind> {
    match kind {
        LEFT_PAREN => Some(RIGHT_PAREN),
        LEFT_BRACKET => Some(RIGHT_BRACKET),
        LEFT_BRACE => Some(RIGHT_BRACE),
        _ => None,
    }
}

/// `"..."`, `` `...' `` or `` `"..."' `` when both delimiters are present.
fn delimiter_pair(node: SyntaxNode<'_>) -> Option<BracketPair> {
    let kind = node.kind();
    let (open, close) = if kind == DOUBLE_STRING {
        (DQUOTE, DQUOTE)
    } else if kind.is_local_macro() {
        (BACKTICK, QUOTE)
    } else if kind.is_compound_string() {
        (COMPOUND_OPEN, COMPOUND_CLOSE)
    } else {
        return None;
    };

    let first = node.first_token()?;
    let last = node.last_token()?;
    if first == last || first.kind() != open || last.kind() != close {
        return None;
    }
    Some(BracketPair { open: first.text_range(), close: last.text_range() })
}
