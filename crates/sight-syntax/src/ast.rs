use crate::SyntaxKind::*;
use crate::{NodeOrToken, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

pub trait Node<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_node {
    ($name:ident, $kind:pat) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> Node<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                matches!(syntax.kind(), $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    };
}

ast_node!(SourceFile, SOURCE_FILE);
ast_node!(Comment, COMMENT);
ast_node!(ProgramDefinition, PROGRAM_DEFINITION);
ast_node!(MataBlock, MATA_BLOCK);
ast_node!(MacroDefinition, MACRO_DEFINITION);
ast_node!(Command, COMMAND);
ast_node!(Prefix, PREFIX);
ast_node!(Name, NAME);
ast_node!(BlockClose, BLOCK_CLOSE);
ast_node!(DoubleString, DOUBLE_STRING);
ast_node!(
    CompoundString,
    COMPOUND_STRING_DEPTH_1
        | COMPOUND_STRING_DEPTH_2
        | COMPOUND_STRING_DEPTH_3
        | COMPOUND_STRING_DEPTH_4
        | COMPOUND_STRING_DEPTH_5
        | COMPOUND_STRING_DEPTH_6
);
ast_node!(
    LocalMacro,
    LOCAL_MACRO_DEPTH_1
        | LOCAL_MACRO_DEPTH_2
        | LOCAL_MACRO_DEPTH_3
        | LOCAL_MACRO_DEPTH_4
        | LOCAL_MACRO_DEPTH_5
        | LOCAL_MACRO_DEPTH_6
);
ast_node!(GlobalMacro, GLOBAL_MACRO);

/// Children of a node that carry meaning: no whitespace and no comments.
fn significant<'a>(node: SyntaxNode<'a>) -> impl Iterator<Item = SyntaxElement<'a>> {
    node.children_with_tokens().filter(|element| match element {
        NodeOrToken::Node(node) => node.kind() != COMMENT,
        NodeOrToken::Token(token) => !token.is_trivia() && !token.kind().is_comment(),
    })
}

fn keyword<'a>(node: SyntaxNode<'a>, kinds: &[SyntaxKind]) -> Option<SyntaxToken<'a>> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| kinds.contains(&token.kind()))
}

impl<'a> SourceFile<'a> {
    pub fn statements(self) -> impl Iterator<Item = Statement<'a>> {
        self.0.children().filter_map(Statement::cast)
    }
}

/// A top-level or program-body statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    Comment(Comment<'a>),
    ProgramDefinition(ProgramDefinition<'a>),
    MataBlock(MataBlock<'a>),
    MacroDefinition(MacroDefinition<'a>),
    Command(Command<'a>),
    BlockClose(BlockClose<'a>),
}

impl<'a> Node<'a> for Statement<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            COMMENT => Some(Statement::Comment(Comment(syntax))),
            PROGRAM_DEFINITION => Some(Statement::ProgramDefinition(ProgramDefinition(syntax))),
            MATA_BLOCK => Some(Statement::MataBlock(MataBlock(syntax))),
            MACRO_DEFINITION => Some(Statement::MacroDefinition(MacroDefinition(syntax))),
            COMMAND => Some(Statement::Command(Command(syntax))),
            BLOCK_CLOSE => Some(Statement::BlockClose(BlockClose(syntax))),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Statement::Comment(it) => it.0,
            Statement::ProgramDefinition(it) => it.0,
            Statement::MataBlock(it) => it.0,
            Statement::MacroDefinition(it) => it.0,
            Statement::Command(it) => it.0,
            Statement::BlockClose(it) => it.0,
        }
    }
}

impl Comment<'_> {
    pub fn is_terminated(self) -> bool {
        self.0.child_by_kind(ERROR).is_none()
    }
}

impl<'a> Name<'a> {
    pub fn text(self) -> &'a str {
        self.0.text_trimmed()
    }
}

impl<'a> ProgramDefinition<'a> {
    pub fn name(self) -> Option<Name<'a>> {
        self.0.children().find_map(Name::cast)
    }

    /// Header options and other tokens between the name and the first line break.
    pub fn header(self) -> impl Iterator<Item = SyntaxElement<'a>> {
        significant(self.0)
            .skip_while(|element| matches!(element.kind(), PROGRAM_KW | DEFINE_KW | NAME))
            .take_while(|element| element.kind() != NEWLINE)
    }

    pub fn body(self) -> impl Iterator<Item = Statement<'a>> {
        self.0.children().filter_map(Statement::cast)
    }

    pub fn end_keyword(self) -> Option<SyntaxToken<'a>> {
        keyword(self.0, &[END_KW])
    }
}

/// Which of the embedded-block forms a mata block uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MataForm {
    /// `mata { ... }`
    Braced,
    /// `mata` or `mata:` followed by lines up to `end`.
    Multiline,
    /// `mata: stmt` or `mata stmt` on a single line.
    Inline,
}

impl<'a> MataBlock<'a> {
    pub fn form(self) -> MataForm {
        if self.0.token_by_kind(LEFT_BRACE).is_some() {
            MataForm::Braced
        } else if self.0.token_by_kind(END_KW).is_some() || self.0.token_by_kind(NEWLINE).is_some()
        {
            MataForm::Multiline
        } else {
            MataForm::Inline
        }
    }

    pub fn has_colon(self) -> bool {
        self.0.token_by_kind(COLON).is_some()
    }

    /// Opaque content of the block, one piece per line for the multiline form.
    pub fn content(self) -> impl Iterator<Item = SyntaxToken<'a>> {
        self.0
            .children_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .filter(|token| token.kind() == MATA_CONTENT)
    }
}

impl<'a> MacroDefinition<'a> {
    /// The `local`, `global` or `temp*` keyword.
    pub fn keyword(self) -> Option<SyntaxToken<'a>> {
        keyword(self.0, &[LOCAL_KW, GLOBAL_KW, TEMP_KW])
    }

    /// First (for `local`/`global`, only) name being defined.
    pub fn name(self) -> Option<Name<'a>> {
        self.names().next()
    }

    pub fn names(self) -> impl Iterator<Item = Name<'a>> {
        self.0.children().filter_map(Name::cast)
    }

    /// Value part of a `local` or `global` definition.
    pub fn value(self) -> impl Iterator<Item = SyntaxElement<'a>> {
        significant(self.0).skip_while(|element| matches!(element.kind(), LOCAL_KW | GLOBAL_KW | NAME))
    }
}

impl<'a> Command<'a> {
    pub fn prefixes(self) -> impl Iterator<Item = Prefix<'a>> {
        self.0.children().filter_map(Prefix::cast)
    }

    pub fn name(self) -> Option<Name<'a>> {
        self.0.children().find_map(Name::cast)
    }

    /// Everything after the command name, minus whitespace and comments.
    pub fn arguments(self) -> impl Iterator<Item = SyntaxElement<'a>> {
        significant(self.0).skip_while(|element| matches!(element.kind(), PREFIX | NAME))
    }
}

impl<'a> Prefix<'a> {
    pub fn keyword(self) -> Option<SyntaxToken<'a>> {
        keyword(self.0, &[PREFIX_KW])
    }

    pub fn has_colon(self) -> bool {
        self.0.token_by_kind(COLON).is_some()
    }
}

impl CompoundString<'_> {
    /// Nesting depth label, 1 to 6.
    pub fn depth(self) -> usize {
        self.0.kind().depth().unwrap_or(1)
    }

    pub fn is_terminated(self) -> bool {
        self.0.last_token().is_some_and(|token| token.kind() == COMPOUND_CLOSE)
    }
}

impl LocalMacro<'_> {
    /// Nesting depth label, 1 to 6.
    pub fn depth(self) -> usize {
        self.0.kind().depth().unwrap_or(1)
    }

    pub fn is_terminated(self) -> bool {
        self.0.last_token().is_some_and(|token| token.kind() == QUOTE)
    }
}

impl DoubleString<'_> {
    pub fn is_terminated(self) -> bool {
        self.0.children_with_tokens().filter(|element| element.kind() == DQUOTE).count() == 2
    }
}

impl<'a> GlobalMacro<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        self.0.token_by_kind(IDENT)
    }

    pub fn is_braced(self) -> bool {
        self.0.token_by_kind(LEFT_BRACE).is_some()
    }
}
