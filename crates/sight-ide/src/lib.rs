//! Editor-facing queries over parsed Stata files: highlighting, bracket
//! matching and indentation.

mod brackets;
mod highlight;
mod indent;

pub use brackets::{BracketPair, bracket_pairs};
pub use highlight::{Capture, HighlightRange, highlight};
pub use indent::{IndentEvent, IndentKind, indent_events};
use sight_db::{File, RootDatabase};
use sight_syntax::{SyntaxKind, SyntaxToken, TokenAtOffset};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePosition {
    pub file: File,
    pub offset: TextSize,
}

#[derive(Default)]
pub struct Analysis {
    db: RootDatabase,
}

impl Analysis {
    pub fn db(&self) -> &RootDatabase {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut RootDatabase {
        &mut self.db
    }

    pub fn highlight(&self, file: File) -> Vec<HighlightRange> {
        highlight(file.parse(self.db()).tree())
    }

    pub fn bracket_pairs(&self, file: File) -> Vec<BracketPair> {
        bracket_pairs(file.parse(self.db()).tree())
    }

    pub fn indent_events(&self, file: File) -> Vec<IndentEvent> {
        indent_events(file.parse(self.db()).tree())
    }

    /// Range of the delimiter paired with the one under the cursor.
    pub fn matching_bracket(&self, FilePosition { file, offset }: FilePosition) -> Option<TextRange> {
        let parse = file.parse(self.db());
        let tokens = parse.root().token_at_offset(offset);
        let token = pick_best_token(tokens, |kind| usize::from(is_delimiter(kind)))?;
        let range = token.text_range();
        bracket_pairs(parse.tree()).into_iter().find_map(|pair| pair.partner(range))
    }
}

fn is_delimiter(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::LEFT_PAREN
            | SyntaxKind::RIGHT_PAREN
            | SyntaxKind::LEFT_BRACKET
            | SyntaxKind::RIGHT_BRACKET
            | SyntaxKind::LEFT_BRACE
            | SyntaxKind::RIGHT_BRACE
            | SyntaxKind::DQUOTE
            | SyntaxKind::BACKTICK
            | SyntaxKind::QUOTE
            | SyntaxKind::COMPOUND_OPEN
            | SyntaxKind::COMPOUND_CLOSE
    )
}

/// The token at an offset that scores highest under `f`; ties go to the right.
pub fn pick_best_token<'a>(
    tokens: TokenAtOffset<SyntaxToken<'a>>,
    f: impl Fn(SyntaxKind) -> usize,
) -> Option<SyntaxToken<'a>> {
    tokens.max_by_key(move |token| f(token.kind()))
}
