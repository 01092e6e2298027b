use std::fmt;
use std::fmt::Write as _;

use text_size::{TextRange, TextSize};

use crate::SyntaxKind;

/// Owned, immutable syntax tree over one source text.
///
/// Nodes and tokens live in flat arrays addressed by index. Tokens are stored
/// in document order, so the tokens below any node form a contiguous run.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub(crate) text: Box<str>,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) tokens: Vec<TokenData>,
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<u32>,
    pub(crate) index_in_parent: u32,
    pub(crate) children: Vec<Child>,
    pub(crate) range: TextRange,
    pub(crate) first_token: u32,
    pub(crate) token_end: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Child {
    Node(u32),
    Token(u32),
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct TokenData {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) parent: u32,
    pub(crate) index_in_parent: u32,
}

impl SyntaxTree {
    /// Returns the root node.
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, index: 0 }
    }

    /// Returns the full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the tree as an indented outline, one element per line.
    pub fn debug_dump(&self) -> String {
        let mut buf = String::new();
        let mut indent = 0;
        for event in self.root().preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    let range = node.text_range();
                    _ = writeln!(
                        buf,
                        "{:indent$}{:?}@{}..{}",
                        "",
                        node.kind(),
                        u32::from(range.start()),
                        u32::from(range.end()),
                    );
                    indent += 2;
                }
                WalkEventWithTokens::LeaveNode(_) => indent -= 2,
                WalkEventWithTokens::Token(token) => {
                    let range = token.text_range();
                    _ = writeln!(
                        buf,
                        "{:indent$}{:?}@{}..{} {:?}",
                        "",
                        token.kind(),
                        u32::from(range.start()),
                        u32::from(range.end()),
                        token.text(),
                    );
                }
            }
        }
        buf
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text.len())
            .field("nodes", &self.nodes.len())
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

/// Copyable reference to a leaf of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a SyntaxTree,
    index: u32,
}

impl<'a> SyntaxToken<'a> {
    fn data(self) -> &'a TokenData {
        &self.tree.tokens[self.index as usize]
    }

    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn is_trivia(self) -> bool {
        self.kind().is_trivia()
    }

    /// Returns the text range covered by this token.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.data().range
    }

    /// Returns the source text of this token.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the previous token in document order.
    pub fn prev_token(self) -> Option<Self> {
        let index = self.index.checked_sub(1)?;
        Some(Self { tree: self.tree, index })
    }

    /// Returns the next token in document order.
    pub fn next_token(self) -> Option<Self> {
        let index = self.index + 1;
        ((index as usize) < self.tree.tokens.len()).then_some(Self { tree: self.tree, index })
    }

    /// Returns the node that directly contains this token.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, index: self.data().parent }
    }

    /// Returns the parent chain, innermost first.
    pub fn parent_ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        self.parent().ancestors()
    }

    /// Returns the sibling element that follows this token.
    pub fn next_sibling_or_token(self) -> Option<SyntaxElement<'a>> {
        self.parent().child_at(self.data().index_in_parent as usize + 1)
    }

    /// Returns the sibling element that precedes this token.
    pub fn prev_sibling_or_token(self) -> Option<SyntaxElement<'a>> {
        let index = (self.data().index_in_parent as usize).checked_sub(1)?;
        self.parent().child_at(index)
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxToken<'_> {}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.text_range();
        write!(f, "{:?}@{}..{}", self.kind(), u32::from(range.start()), u32::from(range.end()))
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Copyable reference to an inner node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    index: u32,
}

impl<'a> SyntaxNode<'a> {
    fn data(self) -> &'a NodeData {
        &self.tree.nodes[self.index as usize]
    }

    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn text_range(self) -> TextRange {
        self.data().range
    }

    /// Returns the range without leading and trailing whitespace leaves.
    pub fn trimmed_range(self) -> TextRange {
        let mut tokens = self.tokens().filter(|token| !token.is_trivia());
        match (tokens.next(), tokens.next_back()) {
            (Some(first), Some(last)) => {
                TextRange::new(first.text_range().start(), last.text_range().end())
            }
            (Some(only), None) => only.text_range(),
            _ => TextRange::empty(self.text_range().start()),
        }
    }

    /// Source text under this node, trivia included.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the text slice excluding leading and trailing whitespace leaves.
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(Self { tree: self.tree, index: self.data().parent? })
    }

    /// This node, then its parent chain.
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    fn element(self, child: Child) -> SyntaxElement<'a> {
        match child {
            Child::Node(index) => NodeOrToken::Node(SyntaxNode { tree: self.tree, index }),
            Child::Token(index) => NodeOrToken::Token(SyntaxToken { tree: self.tree, index }),
        }
    }

    fn child_at(self, index: usize) -> Option<SyntaxElement<'a>> {
        self.data().children.get(index).map(|&child| self.element(child))
    }

    /// Iterates direct children, nodes and tokens alike.
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { node: self, children: self.data().children.iter() }
    }

    /// Iterates direct child nodes, skipping tokens.
    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(NodeOrToken::into_node)
    }

    /// Returns the first direct child node of the given kind.
    pub fn child_by_kind(self, kind: SyntaxKind) -> Option<SyntaxNode<'a>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Returns the first direct child token of the given kind.
    pub fn token_by_kind(self, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .find(|token| token.kind() == kind)
    }

    /// Iterates every token below this node in document order.
    pub fn tokens(self) -> impl DoubleEndedIterator<Item = SyntaxToken<'a>> + Clone {
        let tree = self.tree;
        let data = self.data();
        (data.first_token..data.token_end).map(move |index| SyntaxToken { tree, index })
    }

    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        self.tokens().next()
    }

    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        self.tokens().next_back()
    }

    /// Returns the sibling node that follows this one.
    pub fn next_sibling(self) -> Option<Self> {
        let parent = self.parent()?;
        let start = self.data().index_in_parent as usize + 1;
        parent.data().children[start..].iter().find_map(|&child| match child {
            Child::Node(index) => Some(Self { tree: self.tree, index }),
            Child::Token(_) => None,
        })
    }

    /// Iterates this node and its descendant nodes in preorder.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::EnterNode(node) => Some(node),
            _ => None,
        })
    }

    /// Returns the token covering `offset`.
    ///
    /// An offset on a boundary between two tokens yields both.
    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        let range = self.text_range();
        if !range.contains_inclusive(offset) {
            return TokenAtOffset::None;
        }
        let data = self.data();
        let tokens = &self.tree.tokens[data.first_token as usize..data.token_end as usize];
        let position = tokens.partition_point(|token| token.range.end() < offset);
        let token = |position: usize| SyntaxToken {
            tree: self.tree,
            index: data.first_token + position as u32,
        };
        match tokens.get(position) {
            None => TokenAtOffset::None,
            Some(left) if left.range.end() == offset && position + 1 < tokens.len() => {
                TokenAtOffset::Between(token(position), token(position + 1))
            }
            Some(_) => TokenAtOffset::Single(token(position)),
        }
    }

    /// Returns a preorder iterator over nodes and tokens.
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.text_range();
        write!(f, "{:?}@{}..{}", self.kind(), u32::from(range.start()), u32::from(range.end()))
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    pub fn kind(self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }
}

/// Iterator over the direct children of a node.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    node: SyntaxNode<'a>,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let child = *self.children.next()?;
        Some(self.node.element(child))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let child = *self.children.next_back()?;
        Some(self.node.element(child))
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {}

/// Depth-first walk that reports entering and leaving each node and every
/// token in between.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// Tokens touching an offset: none past the end, two on a boundary.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    None,
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// The token starting at the offset when it sits on a boundary.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(_, right) => Some(right),
        }
    }

    /// The token ending at the offset when it sits on a boundary.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(left, _) => Some(left),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }
}
