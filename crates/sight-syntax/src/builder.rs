//! Incremental builder for the immutable syntax tree.

use text_size::{TextRange, TextSize};

use crate::syntax::{Child, NodeData, TokenData};
use crate::{SyntaxKind, SyntaxTree};

const DEFAULT_TREE_DEPTH: usize = 32;
const DEFAULT_TREE_SIZE: usize = 1024;

/// Builds a `SyntaxTree` from a stream of start, token and finish calls.
///
/// Tokens must be pushed in order and must tile the source text exactly.
pub struct Builder {
    text: Box<str>,
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    opened: Vec<u32>,
    offset: TextSize,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

impl Builder {
    /// Creates a new builder for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            nodes: Vec::with_capacity(DEFAULT_TREE_SIZE / 4),
            tokens: Vec::with_capacity(DEFAULT_TREE_SIZE),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            offset: TextSize::new(0),
        }
    }

    fn index(len: usize) -> u32 {
        u32::try_from(len).unwrap_or_else(|_| panic!("syntax tree exceeds u32::MAX elements"))
    }

    #[track_caller]
    fn current(&self) -> u32 {
        *self.opened.last().expect("no opened nodes?")
    }

    /// Starts a new node of the given kind under the current node.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        debug_assert!(kind.is_node(), "{kind:?} is a token kind");
        let index = Self::index(self.nodes.len());
        let parent = self.opened.last().copied();
        let index_in_parent = match parent {
            Some(parent) => {
                let children = &mut self.nodes[parent as usize].children;
                children.push(Child::Node(index));
                Self::index(children.len() - 1)
            }
            None => {
                assert!(self.nodes.is_empty(), "a syntax tree has exactly one root");
                0
            }
        };
        let first_token = Self::index(self.tokens.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            index_in_parent,
            children: Vec::new(),
            range: TextRange::empty(self.offset),
            first_token,
            token_end: first_token,
        });
        self.opened.push(index);
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let index = self.current();
        self.opened.pop();
        let token_end = Self::index(self.tokens.len());
        let offset = self.offset;
        let node = &mut self.nodes[index as usize];
        node.range = TextRange::new(node.range.start(), offset);
        node.token_end = token_end;
    }

    /// Appends a token of `len` bytes to the current node.
    #[track_caller]
    pub fn token(&mut self, kind: SyntaxKind, len: TextSize) {
        debug_assert!(!kind.is_node(), "{kind:?} is a node kind");
        let parent = self.current();
        let range = TextRange::at(self.offset, len);
        assert!(
            self.text.get(std::ops::Range::<usize>::from(range)).is_some(),
            "token {kind:?} at {range:?} does not fall on the source text"
        );
        let index = Self::index(self.tokens.len());
        let children = &mut self.nodes[parent as usize].children;
        children.push(Child::Token(index));
        let index_in_parent = Self::index(children.len() - 1);
        self.tokens.push(TokenData { kind, range, parent, index_in_parent });
        self.offset = range.end();
    }

    /// Appends a whitespace leaf of `len` bytes, if non-empty.
    pub fn whitespace(&mut self, len: TextSize) {
        if len > TextSize::new(0) {
            self.token(SyntaxKind::WHITESPACE, len);
        }
    }

    /// Finishes building and returns the tree.
    #[track_caller]
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes: {}", self.opened.len());
        assert!(!self.nodes.is_empty(), "a syntax tree needs a root node");
        assert_eq!(
            self.offset,
            TextSize::of(&*self.text),
            "tokens do not cover the whole source text"
        );
        SyntaxTree {
            text: std::mem::take(&mut self.text),
            nodes: std::mem::take(&mut self.nodes),
            tokens: std::mem::take(&mut self.tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::Builder;
    use crate::SyntaxKind::*;
    use crate::{NodeOrToken, SyntaxKind};

    fn build(text: &str, f: impl FnOnce(&mut Builder)) -> crate::SyntaxTree {
        let mut builder = Builder::new(text);
        f(&mut builder);
        builder.finish()
    }

    fn len(n: u32) -> TextSize {
        TextSize::new(n)
    }

    #[test]
    fn round_trips_text() {
        let tree = build("use x\n", |b| {
            b.start_node(SOURCE_FILE);
            b.start_node(COMMAND);
            b.start_node(NAME);
            b.token(IDENT, len(3));
            b.finish_node();
            b.whitespace(len(1));
            b.token(IDENT, len(1));
            b.finish_node();
            b.token(NEWLINE, len(1));
            b.token(EOF, len(0));
            b.finish_node();
        });

        let root = tree.root();
        assert_eq!(root.text(), "use x\n");
        let command = root.children().next().unwrap();
        assert_eq!(command.kind(), COMMAND);
        assert_eq!(command.text(), "use x");
        assert_eq!(command.tokens().count(), 3);
        assert_eq!(command.parent(), Some(root));

        let kinds: Vec<SyntaxKind> = root.children_with_tokens().map(|it| it.kind()).collect();
        assert_eq!(kinds, [COMMAND, NEWLINE, EOF]);
    }

    #[test]
    fn navigation_between_tokens() {
        let tree = build(" a b", |b| {
            b.start_node(SOURCE_FILE);
            b.whitespace(len(1));
            b.start_node(COMMAND);
            b.token(IDENT, len(1));
            b.whitespace(len(1));
            b.token(IDENT, len(1));
            b.finish_node();
            b.token(EOF, len(0));
            b.finish_node();
        });

        let root = tree.root();
        let command = root.child_by_kind(COMMAND).unwrap();
        assert_eq!(u32::from(command.text_range().start()), 1);
        assert_eq!(command.trimmed_range(), command.text_range());

        let first = command.first_token().unwrap();
        assert_eq!(first.text(), "a");
        assert_eq!(first.prev_token().map(|it| it.kind()), Some(WHITESPACE));
        let Some(NodeOrToken::Token(space)) = first.next_sibling_or_token() else {
            panic!("expected a whitespace sibling");
        };
        assert!(space.is_trivia());
        assert_eq!(command.last_token().unwrap().text(), "b");
        assert_eq!(tree.root().last_token().unwrap().kind(), EOF);
    }

    #[test]
    fn token_at_offset_between_tokens() {
        let tree = build("ab", |b| {
            b.start_node(SOURCE_FILE);
            b.token(IDENT, len(1));
            b.token(OTHER, len(1));
            b.token(EOF, len(0));
            b.finish_node();
        });

        let root = tree.root();
        let at = |offset| root.token_at_offset(TextSize::new(offset));
        assert_eq!(at(0).right_biased().map(|it| it.kind()), Some(IDENT));
        assert_eq!(at(1).left_biased().map(|it| it.kind()), Some(IDENT));
        assert_eq!(at(1).right_biased().map(|it| it.kind()), Some(OTHER));
    }

    #[test]
    fn debug_dump_lists_every_element() {
        let tree = build("x ", |b| {
            b.start_node(SOURCE_FILE);
            b.token(IDENT, len(1));
            b.whitespace(len(1));
            b.token(EOF, len(0));
            b.finish_node();
        });

        assert_eq!(
            tree.debug_dump(),
            "SOURCE_FILE@0..2\n  IDENT@0..1 \"x\"\n  WHITESPACE@1..2 \" \"\n  EOF@2..2 \"\"\n"
        );
    }

    #[test]
    #[should_panic(expected = "tokens do not cover the whole source text")]
    fn rejects_partial_coverage() {
        build("abc", |b| {
            b.start_node(SOURCE_FILE);
            b.token(IDENT, len(1));
            b.finish_node();
        });
    }
}
