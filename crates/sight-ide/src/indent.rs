use sight_syntax::ast::{MataBlock, MataForm, Node as _};
use sight_syntax::SyntaxKind::*;
use sight_syntax::{SyntaxTree, WalkEventWithTokens};
use text_size::TextSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    /// Lines after this point are indented one level deeper.
    Indent,
    /// Lines from this point are indented one level shallower.
    Outdent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentEvent {
    pub offset: TextSize,
    pub kind: IndentKind,
}

/// Indentation changes in document order.
///
/// Program definitions and multiline or braced mata blocks indent at their
/// start, and so does every `{` outside a mata block or global macro. Their
/// closing `}` or `end` outdents.
pub fn indent_events(tree: &SyntaxTree) -> Vec<IndentEvent> {
    let mut events = Vec::new();
    let mut push = |offset, kind| events.push(IndentEvent { offset, kind });

    for event in tree.root().preorder_with_tokens() {
        match event {
            WalkEventWithTokens::EnterNode(node) => match node.kind() {
                PROGRAM_DEFINITION => push(node.text_range().start(), IndentKind::Indent),
                MATA_BLOCK => {
                    let inline = MataBlock::cast(node).is_some_and(|it| it.form() == MataForm::Inline);
                    if !inline {
                        push(node.text_range().start(), IndentKind::Indent);
                    }
                }
                _ => {}
            },
            WalkEventWithTokens::LeaveNode(_) => {}
            WalkEventWithTokens::Token(token) => {
                let parent = token.parent().kind();
                let offset = token.text_range().start();
                match token.kind() {
                    LEFT_BRACE if !matches!(parent, MATA_BLOCK | GLOBAL_MACRO) => {
                        push(offset, IndentKind::Indent);
                    }
                    RIGHT_BRACE if parent != GLOBAL_MACRO => push(offset, IndentKind::Outdent),
                    END_KW if matches!(parent, PROGRAM_DEFINITION | MATA_BLOCK) => {
                        push(offset, IndentKind::Outdent);
                    }
                    _ => {}
                }
            }
        }
    }

    events
}
