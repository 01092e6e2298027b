/// Every token and node kind in a Stata syntax tree.
///
/// Token kinds come first, then contextual keywords the parser remaps
/// identifiers to, then composite node kinds.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,
    CONTINUATION_COMMENT,
    STAR_COMMENT,
    BLOCK_COMMENT,

    DQUOTE,
    ESCAPED_QUOTE,
    STRING_ESCAPE,
    STRING_TEXT,
    COMPOUND_OPEN,
    COMPOUND_CLOSE,
    COMPOUND_TEXT,
    BACKTICK,
    QUOTE,
    MACRO_TEXT,
    DOLLAR,

    NUMBER,
    MISSING_VALUE,
    BUILTIN_VARIABLE,
    CONTROL_KEYWORD,
    TYPE_KEYWORD,
    IDENT,

    OPERATOR,
    HASH,
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COLON,
    COMMA,
    OTHER,
    MATA_CONTENT,
    UNKNOWN,
    EOF,

    PROGRAM_KW,
    DEFINE_KW,
    END_KW,
    MATA_KW,
    LOCAL_KW,
    GLOBAL_KW,
    TEMP_KW,
    PREFIX_KW,

    SOURCE_FILE,
    COMMENT,
    PROGRAM_DEFINITION,
    MATA_BLOCK,
    MACRO_DEFINITION,
    COMMAND,
    PREFIX,
    NAME,
    BLOCK_CLOSE,
    DOUBLE_STRING,
    COMPOUND_STRING_DEPTH_1,
    COMPOUND_STRING_DEPTH_2,
    COMPOUND_STRING_DEPTH_3,
    COMPOUND_STRING_DEPTH_4,
    COMPOUND_STRING_DEPTH_5,
    COMPOUND_STRING_DEPTH_6,
    LOCAL_MACRO_DEPTH_1,
    LOCAL_MACRO_DEPTH_2,
    LOCAL_MACRO_DEPTH_3,
    LOCAL_MACRO_DEPTH_4,
    LOCAL_MACRO_DEPTH_5,
    LOCAL_MACRO_DEPTH_6,
    GLOBAL_MACRO,
    ERROR,
    TOMBSTONE,
}

use SyntaxKind::*;

/// Number of distinct depth kinds before nesting wraps around.
pub const DEPTH_CYCLE: usize = 6;

const COMPOUND_STRING_DEPTHS: [SyntaxKind; DEPTH_CYCLE] = [
    COMPOUND_STRING_DEPTH_1,
    COMPOUND_STRING_DEPTH_2,
    COMPOUND_STRING_DEPTH_3,
    COMPOUND_STRING_DEPTH_4,
    COMPOUND_STRING_DEPTH_5,
    COMPOUND_STRING_DEPTH_6,
];

const LOCAL_MACRO_DEPTHS: [SyntaxKind; DEPTH_CYCLE] = [
    LOCAL_MACRO_DEPTH_1,
    LOCAL_MACRO_DEPTH_2,
    LOCAL_MACRO_DEPTH_3,
    LOCAL_MACRO_DEPTH_4,
    LOCAL_MACRO_DEPTH_5,
    LOCAL_MACRO_DEPTH_6,
];

impl SyntaxKind {
    /// Kind of a compound string nested `depth` levels deep, counting from 1.
    ///
    /// Depths past the sixth wrap back to the first.
    pub const fn compound_string(depth: usize) -> Self {
        COMPOUND_STRING_DEPTHS[depth.saturating_sub(1) % DEPTH_CYCLE]
    }

    /// Kind of a local macro nested `depth` levels deep, counting from 1.
    pub const fn local_macro(depth: usize) -> Self {
        LOCAL_MACRO_DEPTHS[depth.saturating_sub(1) % DEPTH_CYCLE]
    }

    /// Depth label (1 to 6) carried by compound string and local macro nodes.
    pub fn depth(self) -> Option<usize> {
        let position = |kinds: &[Self]| kinds.iter().position(|&kind| kind == self);
        position(&COMPOUND_STRING_DEPTHS)
            .or_else(|| position(&LOCAL_MACRO_DEPTHS))
            .map(|index| index + 1)
    }

    pub fn is_compound_string(self) -> bool {
        COMPOUND_STRING_DEPTHS.contains(&self)
    }

    pub fn is_local_macro(self) -> bool {
        LOCAL_MACRO_DEPTHS.contains(&self)
    }

    pub fn is_trivia(self) -> bool {
        self == WHITESPACE
    }

    pub fn is_comment(self) -> bool {
        matches!(self, LINE_COMMENT | CONTINUATION_COMMENT | STAR_COMMENT | BLOCK_COMMENT)
    }

    /// Contextual keywords recognised by the parser at statement start.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            CONTROL_KEYWORD
                | PROGRAM_KW
                | DEFINE_KW
                | END_KW
                | MATA_KW
                | LOCAL_KW
                | GLOBAL_KW
                | TEMP_KW
                | PREFIX_KW
        )
    }

    /// Whether this kind only ever labels interior nodes.
    pub fn is_node(self) -> bool {
        self >= SOURCE_FILE
    }

    /// Stable, human-readable name used by consumers and tree dumps.
    pub fn name(self) -> &'static str {
        match self {
            WHITESPACE => "whitespace",
            NEWLINE => "newline",
            LINE_COMMENT => "line_comment",
            CONTINUATION_COMMENT => "continuation_comment",
            STAR_COMMENT => "star_comment",
            BLOCK_COMMENT => "block_comment",
            DQUOTE => "dquote",
            ESCAPED_QUOTE => "escaped_quote",
            STRING_ESCAPE => "string_escape",
            STRING_TEXT => "string_text",
            COMPOUND_OPEN => "compound_open",
            COMPOUND_CLOSE => "compound_close",
            COMPOUND_TEXT => "compound_text",
            BACKTICK => "backtick",
            QUOTE => "quote",
            MACRO_TEXT => "macro_text",
            DOLLAR => "dollar",
            NUMBER => "number",
            MISSING_VALUE => "missing_value",
            BUILTIN_VARIABLE => "builtin_variable",
            CONTROL_KEYWORD => "control_keyword",
            TYPE_KEYWORD => "type_keyword",
            IDENT => "identifier",
            OPERATOR => "operator",
            HASH => "hash",
            LEFT_PAREN => "left_paren",
            RIGHT_PAREN => "right_paren",
            LEFT_BRACKET => "left_bracket",
            RIGHT_BRACKET => "right_bracket",
            LEFT_BRACE => "left_brace",
            RIGHT_BRACE => "right_brace",
            COLON => "colon",
            COMMA => "comma",
            OTHER => "other",
            MATA_CONTENT => "mata_content",
            UNKNOWN => "unknown",
            EOF => "eof",
            PROGRAM_KW => "program_keyword",
            DEFINE_KW => "define_keyword",
            END_KW => "end_keyword",
            MATA_KW => "mata_keyword",
            LOCAL_KW => "local_keyword",
            GLOBAL_KW => "global_keyword",
            TEMP_KW => "temp_keyword",
            PREFIX_KW => "prefix_keyword",
            SOURCE_FILE => "source_file",
            COMMENT => "comment",
            PROGRAM_DEFINITION => "program_definition",
            MATA_BLOCK => "mata_block",
            MACRO_DEFINITION => "macro_definition",
            COMMAND => "command",
            PREFIX => "prefix",
            NAME => "name",
            BLOCK_CLOSE => "block_close",
            DOUBLE_STRING => "double_string",
            COMPOUND_STRING_DEPTH_1 => "compound_string_depth_1",
            COMPOUND_STRING_DEPTH_2 => "compound_string_depth_2",
            COMPOUND_STRING_DEPTH_3 => "compound_string_depth_3",
            COMPOUND_STRING_DEPTH_4 => "compound_string_depth_4",
            COMPOUND_STRING_DEPTH_5 => "compound_string_depth_5",
            COMPOUND_STRING_DEPTH_6 => "compound_string_depth_6",
            LOCAL_MACRO_DEPTH_1 => "local_macro_depth_1",
            LOCAL_MACRO_DEPTH_2 => "local_macro_depth_2",
            LOCAL_MACRO_DEPTH_3 => "local_macro_depth_3",
            LOCAL_MACRO_DEPTH_4 => "local_macro_depth_4",
            LOCAL_MACRO_DEPTH_5 => "local_macro_depth_5",
            LOCAL_MACRO_DEPTH_6 => "local_macro_depth_6",
            GLOBAL_MACRO => "global_macro",
            ERROR => "ERROR",
            TOMBSTONE => "tombstone",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_kinds_wrap_after_six() {
        assert_eq!(SyntaxKind::local_macro(1), LOCAL_MACRO_DEPTH_1);
        assert_eq!(SyntaxKind::local_macro(6), LOCAL_MACRO_DEPTH_6);
        assert_eq!(SyntaxKind::local_macro(7), LOCAL_MACRO_DEPTH_1);
        assert_eq!(SyntaxKind::compound_string(9), COMPOUND_STRING_DEPTH_3);
        assert_eq!(SyntaxKind::compound_string(12), COMPOUND_STRING_DEPTH_6);
    }

    #[test]
    fn depth_labels() {
        assert_eq!(LOCAL_MACRO_DEPTH_4.depth(), Some(4));
        assert_eq!(COMPOUND_STRING_DEPTH_2.depth(), Some(2));
        assert_eq!(DOUBLE_STRING.depth(), None);
    }

    #[test]
    fn node_kinds_follow_tokens() {
        assert!(SOURCE_FILE.is_node());
        assert!(ERROR.is_node());
        assert!(!PREFIX_KW.is_node());
        assert!(!EOF.is_node());
    }
}
