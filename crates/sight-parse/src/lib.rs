//! Parser for Stata scripts.
//!
//! [`parse`] never fails: malformed input becomes `ERROR` nodes in the tree
//! plus diagnostics on the side.

use std::fmt::Write as _;

use sight_errors::Diagnostic;
use sight_syntax::ast::{self, Node as _};
use sight_syntax::{SyntaxNode, SyntaxTree};

mod grammar;
mod parser;

/// The outcome of parsing one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn source_file(&self) -> ast::SourceFile<'_> {
        match ast::SourceFile::cast(self.root()) {
            Some(file) => file,
            None => unreachable!("the root is always a source file"),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Tree outline followed by the diagnostics, one per line.
    pub fn debug_dump(&self) -> String {
        let mut buf = self.tree.debug_dump();
        buf.push_str("Errors:\n");
        for diagnostic in &self.diagnostics {
            let range = diagnostic.range();
            _ = writeln!(
                buf,
                "  {}..{} {}: {}",
                u32::from(range.start()),
                u32::from(range.end()),
                diagnostic.kind(),
                diagnostic.message()
            );
        }
        buf
    }
}

pub fn parse(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::statements::source_file(&mut parser);
    let (tree, diagnostics) = parser.build_tree();
    Parse { tree, diagnostics }
}
