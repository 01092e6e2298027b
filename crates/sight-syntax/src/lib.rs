//! Lossless, immutable syntax tree for Stata scripts.
//!
//! Every byte of the source belongs to exactly one leaf, whitespace and the
//! empty end-of-file marker included, so the tree prints back verbatim.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod syntax;
mod syntax_kind;
mod syntax_set;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, PreorderWithTokens, SyntaxElement, SyntaxNode, SyntaxToken,
    SyntaxTree, TokenAtOffset, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::{DEPTH_CYCLE, SyntaxKind};
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
