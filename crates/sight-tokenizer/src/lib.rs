//! Mode-driven tokenizer for Stata scripts.
//!
//! Stata's lexical structure depends on context: the same backtick opens a
//! local macro in a command but is plain text inside a mata block. The parser
//! therefore names a [`LexMode`] every time it asks for the next token.

mod classes;
mod cursor;
mod line_start;

pub use classes::classify_word;
use classes::{is_ident_continue, is_ident_start};
use cursor::{Cursor, is_horizontal_space, is_line_break};
pub use line_start::is_line_start;
pub use sight_syntax::SyntaxKind;
use sight_syntax::SyntaxKind::*;
use text_size::{TextRange, TextSize};

/// A lexed token and the run of spaces and tabs in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub leading: TextSize,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
}

impl Token {
    /// Start of the token including its leading whitespace.
    pub fn full_start(&self) -> TextSize {
        self.kind_range.start() - self.leading
    }
}

/// Lexical context the next token is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Ordinary statement text.
    #[default]
    Statement,
    /// Inside `"..."`.
    DoubleString,
    /// Inside `` `"..."' ``.
    CompoundString,
    /// Inside `` `...' ``.
    LocalMacro,
    /// Right after `$`, reading `name` or `{name}`.
    GlobalMacro,
    /// After the `mata` keyword, up to the end of its line.
    MataHead,
    /// A line of a multiline mata block.
    MataLine,
    /// Inside the braces of `mata { ... }`.
    MataBrace,
}

impl LexMode {
    fn skips_whitespace(self) -> bool {
        matches!(self, Self::Statement | Self::MataHead | Self::MataLine)
    }
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    current: Token,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer with the first token read in statement mode.
    pub fn new(text: &'a str) -> Self {
        Self::with_mode(text, LexMode::Statement)
    }

    /// Creates a tokenizer with the first token read in `mode`.
    fn with_mode(text: &'a str, mode: LexMode) -> Self {
        let cursor = Cursor::new(text);
        let current = Token {
            leading: TextSize::new(0),
            kind: EOF,
            kind_range: TextRange::empty(TextSize::new(0)),
        };
        let mut tokenizer = Self { text, cursor, current };
        tokenizer.current = tokenizer.lex(mode);
        tokenizer
    }

    /// The lookahead token.
    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Source text of `token`, without its leading whitespace.
    pub fn token_text(&self, token: &Token) -> &'a str {
        &self.text[token.kind_range]
    }

    /// Returns the lookahead token and reads the one after it in `mode`.
    pub fn next_token(&mut self, mode: LexMode) -> Token {
        let next = self.lex(mode);
        std::mem::replace(&mut self.current, next)
    }

    /// Reads the lookahead token again, from its leading whitespace, in `mode`.
    pub fn relex(&mut self, mode: LexMode) {
        let start = usize::from(self.current.full_start());
        self.cursor = Cursor::new(&self.text[start..]);
        self.current = self.lex(mode);
    }

    fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn lexeme(&self) -> &'a str {
        &self.text[self.range()]
    }

    fn lex(&mut self, mode: LexMode) -> Token {
        self.cursor.reset_pos_within_token();
        if mode.skips_whitespace() {
            self.cursor.advance_while(is_horizontal_space);
        }
        let leading = self.cursor.pos_within_token();
        self.cursor.reset_pos_within_token();

        let kind = match mode {
            LexMode::Statement => self.statement(),
            LexMode::DoubleString => self.double_string(),
            LexMode::CompoundString => self.compound_string(),
            LexMode::LocalMacro => self.local_macro(),
            LexMode::GlobalMacro => self.global_macro(),
            LexMode::MataHead => self.mata_head(),
            LexMode::MataLine => self.mata_line(),
            LexMode::MataBrace => self.mata_brace(),
        };

        let kind_range = self.range();
        self.cursor.reset_pos_within_token();
        Token { leading, kind, kind_range }
    }

    fn newline(&mut self, first: char) -> SyntaxKind {
        if first == '\r' && self.cursor.matches('\n') {
            self.cursor.advance();
        }
        NEWLINE
    }

    /// `$` opens a global macro only when a name or `{` follows.
    fn at_global_macro(&self) -> bool {
        let next = self.cursor.peek();
        is_ident_start(next) || next == '{'
    }

    fn statement(&mut self) -> SyntaxKind {
        let start = self.offset();
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            '/' if self.cursor.matches('/') => {
                self.cursor.advance();
                let kind =
                    if self.cursor.matches('/') { CONTINUATION_COMMENT } else { LINE_COMMENT };
                self.cursor.advance_line();
                kind
            }
            '/' if self.cursor.matches('*') => {
                self.cursor.advance();
                self.block_comment();
                BLOCK_COMMENT
            }
            '*' if is_line_start(self.text, start) => {
                self.cursor.advance_line();
                STAR_COMMENT
            }
            '"' => DQUOTE,
            '`' if self.cursor.matches('"') => {
                self.cursor.advance();
                COMPOUND_OPEN
            }
            '`' => BACKTICK,
            '$' if self.at_global_macro() => DOLLAR,
            '0'..='9' => self.number(),
            '.' if self.cursor.peek().is_ascii_digit() => {
                self.digits();
                self.exponent();
                NUMBER
            }
            '.' => self.missing_value(),
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                classify_word(self.lexeme())
            }
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ':' => COLON,
            ',' => COMMA,
            '#' => HASH,
            '=' | '!' | '~' | '<' | '>' => {
                if self.cursor.matches('=') {
                    self.cursor.advance();
                }
                OPERATOR
            }
            '+' | '-' | '*' | '/' | '^' | '&' | '|' => OPERATOR,
            c if c.is_whitespace() => UNKNOWN,
            _ => {
                self.cursor.advance_while(|c| !c.is_whitespace() && !starts_statement_token(c));
                OTHER
            }
        }
    }

    fn block_comment(&mut self) {
        while let Some(c) = self.cursor.bump() {
            if c == '*' && self.cursor.matches('/') {
                self.cursor.advance();
                return;
            }
        }
    }

    fn number(&mut self) -> SyntaxKind {
        self.digits();
        if self.cursor.matches('.') {
            self.cursor.advance();
            self.digits();
        }
        self.exponent();
        NUMBER
    }

    fn digits(&mut self) {
        self.cursor.advance_while(|c| c.is_ascii_digit());
    }

    /// Consumes an exponent only when digits actually follow it.
    fn exponent(&mut self) {
        if !matches!(self.cursor.peek(), 'e' | 'E') {
            return;
        }
        let signed = matches!(self.cursor.second(), '+' | '-');
        let first_digit = if signed { self.cursor.third() } else { self.cursor.second() };
        if !first_digit.is_ascii_digit() {
            return;
        }
        self.cursor.advance();
        if signed {
            self.cursor.advance();
        }
        self.digits();
    }

    /// `.` alone, or `.a` through `.z` when no identifier character follows.
    fn missing_value(&mut self) -> SyntaxKind {
        if self.cursor.peek().is_ascii_lowercase() && !is_ident_continue(self.cursor.second()) {
            self.cursor.advance();
        }
        MISSING_VALUE
    }

    fn double_string(&mut self) -> SyntaxKind {
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            '"' if self.cursor.matches('"') => {
                self.cursor.advance();
                ESCAPED_QUOTE
            }
            '"' => DQUOTE,
            '\\' if !self.cursor.is_eof() && !is_line_break(self.cursor.peek()) => {
                self.cursor.advance();
                STRING_ESCAPE
            }
            '$' if self.at_global_macro() => DOLLAR,
            _ => {
                self.text_run(|c| matches!(c, '"' | '\\'));
                STRING_TEXT
            }
        }
    }

    fn compound_string(&mut self) -> SyntaxKind {
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            '`' if self.cursor.matches('"') => {
                self.cursor.advance();
                COMPOUND_OPEN
            }
            '`' => BACKTICK,
            '"' if self.cursor.matches('\'') => {
                self.cursor.advance();
                COMPOUND_CLOSE
            }
            '"' => DQUOTE,
            '$' if self.at_global_macro() => DOLLAR,
            _ => {
                self.text_run(|c| matches!(c, '`' | '"'));
                COMPOUND_TEXT
            }
        }
    }

    fn local_macro(&mut self) -> SyntaxKind {
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            '`' => BACKTICK,
            '\'' => QUOTE,
            '"' => DQUOTE,
            '$' if self.at_global_macro() => DOLLAR,
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            '0'..='9' => {
                self.digits();
                NUMBER
            }
            _ => {
                self.text_run(|c| {
                    matches!(c, '`' | '\'' | '"') || is_ident_start(c) || c.is_ascii_digit()
                });
                MACRO_TEXT
            }
        }
    }

    /// Consumes text up to a line break, a `$` that opens a global macro, or
    /// any character for which `stop` holds.
    fn text_run(&mut self, stop: impl Fn(char) -> bool) {
        loop {
            let c = self.cursor.peek();
            if self.cursor.is_eof() || is_line_break(c) || stop(c) {
                return;
            }
            if c == '$' && (is_ident_start(self.cursor.second()) || self.cursor.second() == '{') {
                return;
            }
            self.cursor.advance();
        }
    }

    fn global_macro(&mut self) -> SyntaxKind {
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            _ => OTHER,
        }
    }

    fn mata_head(&mut self) -> SyntaxKind {
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            ':' => COLON,
            '{' => LEFT_BRACE,
            _ => {
                self.cursor.advance_line();
                MATA_CONTENT
            }
        }
    }

    /// One line of a multiline block: either its `end` terminator or opaque
    /// content.
    fn mata_line(&mut self) -> SyntaxKind {
        if self.at_mata_end() {
            self.cursor.advance_while(is_ident_continue);
            return CONTROL_KEYWORD;
        }
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };

        match first {
            '\n' | '\r' => self.newline(first),
            _ => {
                self.cursor.advance_line();
                MATA_CONTENT
            }
        }
    }

    /// `end` followed on its line by nothing but spaces, tabs and a comment.
    fn at_mata_end(&self) -> bool {
        let Some(rest) = self.cursor.as_str().strip_prefix("end") else {
            return false;
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        rest.starts_with("//")
            || rest.starts_with("/*")
            || rest.chars().next().is_none_or(is_line_break)
    }

    /// Content of `mata { ... }` up to the brace that balances the opener.
    fn mata_brace(&mut self) -> SyntaxKind {
        let Some(first) = self.cursor.bump() else {
            return EOF;
        };
        if first == '}' {
            return RIGHT_BRACE;
        }

        let mut depth = usize::from(first == '{');
        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '{' => depth += 1,
                '}' if depth == 0 => break,
                '}' => depth -= 1,
                _ => {}
            }
            self.cursor.advance();
        }
        MATA_CONTENT
    }
}

/// Whether a `BLOCK_COMMENT` token's text includes its closing `*/`.
pub fn is_terminated_block_comment(text: &str) -> bool {
    text.len() >= 4 && text.ends_with("*/")
}

/// Characters that begin a token of their own in statement text and so end a
/// fallback run.
fn starts_statement_token(c: char) -> bool {
    is_ident_start(c)
        || c.is_ascii_digit()
        || matches!(
            c,
            '.' | '"'
                | '`'
                | '$'
                | '('
                | ')'
                | '['
                | ']'
                | '{'
                | '}'
                | ':'
                | ','
                | '#'
                | '='
                | '!'
                | '~'
                | '<'
                | '>'
                | '+'
                | '-'
                | '*'
                | '/'
                | '^'
                | '&'
                | '|'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(text: &str, mode: LexMode) -> Vec<(SyntaxKind, &str)> {
        let mut tokenizer = Tokenizer::with_mode(text, mode);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token(mode);
            if token.kind == EOF {
                break;
            }
            tokens.push((token.kind, &text[token.kind_range]));
        }
        tokens
    }

    fn statement(text: &str) -> Vec<(SyntaxKind, &str)> {
        lex_all(text, LexMode::Statement)
    }

    #[test]
    fn test_tokens_tile_the_input() {
        let text = "  gen x = 1 // note\n\tdisplay `a' ";
        let mut tokenizer = Tokenizer::new(text);
        let mut offset = TextSize::new(0);
        loop {
            let token = tokenizer.next_token(LexMode::Statement);
            assert_eq!(token.full_start(), offset);
            offset = token.kind_range.end();
            if token.kind == EOF {
                break;
            }
        }
        assert_eq!(offset, TextSize::of(text));
    }

    #[test]
    fn test_newlines() {
        assert_eq!(
            statement("a\nb\r\nc\rd"),
            [
                (IDENT, "a"),
                (NEWLINE, "\n"),
                (IDENT, "b"),
                (NEWLINE, "\r\n"),
                (IDENT, "c"),
                (NEWLINE, "\r"),
                (IDENT, "d"),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(statement("// line"), [(LINE_COMMENT, "// line")]);
        assert_eq!(statement("x /// more\n"), [
            (IDENT, "x"),
            (CONTINUATION_COMMENT, "/// more"),
            (NEWLINE, "\n")
        ]);
        assert_eq!(statement("/* a\n b */x"), [(BLOCK_COMMENT, "/* a\n b */"), (IDENT, "x")]);
        assert_eq!(statement("/* open"), [(BLOCK_COMMENT, "/* open")]);
    }

    #[test]
    fn test_block_comment_termination() {
        assert!(is_terminated_block_comment("/**/"));
        assert!(is_terminated_block_comment("/* x */"));
        assert!(!is_terminated_block_comment("/*/"));
        assert!(!is_terminated_block_comment("/* x"));
    }

    #[test]
    fn test_star_comment_only_at_line_start() {
        assert_eq!(statement("* note"), [(STAR_COMMENT, "* note")]);
        assert_eq!(statement("  * note"), [(STAR_COMMENT, "* note")]);
        assert_eq!(statement("x\n* note"), [
            (IDENT, "x"),
            (NEWLINE, "\n"),
            (STAR_COMMENT, "* note")
        ]);
        assert_eq!(statement("x * y"), [(IDENT, "x"), (OPERATOR, "*"), (IDENT, "y")]);
    }

    #[test]
    fn test_numbers() {
        for input in ["1", "123", "1.5", "1.", ".5", "1e5", "1.5e-3", "2E+10"] {
            assert_eq!(statement(input), [(NUMBER, input)], "Input: '{input}'");
        }
    }

    #[test]
    fn test_exponent_needs_digits() {
        assert_eq!(statement("1e"), [(NUMBER, "1"), (IDENT, "e")]);
        assert_eq!(statement("2e+"), [(NUMBER, "2"), (IDENT, "e"), (OPERATOR, "+")]);
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(statement("."), [(MISSING_VALUE, ".")]);
        assert_eq!(statement(".a"), [(MISSING_VALUE, ".a")]);
        assert_eq!(statement(".z"), [(MISSING_VALUE, ".z")]);
        assert_eq!(statement(".ab"), [(MISSING_VALUE, "."), (IDENT, "ab")]);
        assert_eq!(statement(".A"), [(MISSING_VALUE, "."), (IDENT, "A")]);
    }

    #[test]
    fn test_word_classes() {
        assert_eq!(statement("foreach _n str10 x1"), [
            (CONTROL_KEYWORD, "foreach"),
            (BUILTIN_VARIABLE, "_n"),
            (TYPE_KEYWORD, "str10"),
            (IDENT, "x1")
        ]);
    }

    #[test]
    fn test_operators_and_punctuation() {
        assert_eq!(statement("a==b!=c~=d<=e>=f"), [
            (IDENT, "a"),
            (OPERATOR, "=="),
            (IDENT, "b"),
            (OPERATOR, "!="),
            (IDENT, "c"),
            (OPERATOR, "~="),
            (IDENT, "d"),
            (OPERATOR, "<="),
            (IDENT, "e"),
            (OPERATOR, ">="),
            (IDENT, "f"),
        ]);
        assert_eq!(statement("(x[1]),{}:#"), [
            (LEFT_PAREN, "("),
            (IDENT, "x"),
            (LEFT_BRACKET, "["),
            (NUMBER, "1"),
            (RIGHT_BRACKET, "]"),
            (RIGHT_PAREN, ")"),
            (COMMA, ","),
            (LEFT_BRACE, "{"),
            (RIGHT_BRACE, "}"),
            (COLON, ":"),
            (HASH, "#"),
        ]);
    }

    #[test]
    fn test_macro_openers() {
        assert_eq!(statement("`x'"), [(BACKTICK, "`"), (IDENT, "x"), (OTHER, "'")]);
        assert_eq!(statement("`\"x"), [(COMPOUND_OPEN, "`\""), (IDENT, "x")]);
        assert_eq!(statement("$x ${y}"), [
            (DOLLAR, "$"),
            (IDENT, "x"),
            (DOLLAR, "$"),
            (LEFT_BRACE, "{"),
            (IDENT, "y"),
            (RIGHT_BRACE, "}")
        ]);
        assert_eq!(statement("$5"), [(OTHER, "$"), (NUMBER, "5")]);
    }

    #[test]
    fn test_fallback_and_unknown() {
        assert_eq!(statement("@@ %"), [(OTHER, "@@"), (OTHER, "%")]);
        assert_eq!(statement("\u{c}"), [(UNKNOWN, "\u{c}")]);
        assert_eq!(statement("a\u{a0}b"), [(IDENT, "a"), (UNKNOWN, "\u{a0}"), (IDENT, "b")]);
    }

    #[test]
    fn test_double_string_mode() {
        assert_eq!(lex_all(r#"ab \" "" $x"#, LexMode::DoubleString), [
            (STRING_TEXT, "ab "),
            (STRING_ESCAPE, "\\\""),
            (STRING_TEXT, " "),
            (ESCAPED_QUOTE, "\"\""),
            (STRING_TEXT, " "),
            (DOLLAR, "$"),
            (STRING_TEXT, "x"),
        ]);
        assert_eq!(lex_all("a $ 1\"", LexMode::DoubleString), [
            (STRING_TEXT, "a $ 1"),
            (DQUOTE, "\"")
        ]);
    }

    #[test]
    fn test_compound_string_mode() {
        assert_eq!(lex_all("say \"hi\" `\"x\"' `y'\"'", LexMode::CompoundString), [
            (COMPOUND_TEXT, "say "),
            (DQUOTE, "\""),
            (COMPOUND_TEXT, "hi"),
            (DQUOTE, "\""),
            (COMPOUND_TEXT, " "),
            (COMPOUND_OPEN, "`\""),
            (COMPOUND_TEXT, "x"),
            (COMPOUND_CLOSE, "\"'"),
            (COMPOUND_TEXT, " "),
            (BACKTICK, "`"),
            (COMPOUND_TEXT, "y'"),
            (COMPOUND_CLOSE, "\"'"),
        ]);
    }

    #[test]
    fn test_local_macro_mode() {
        assert_eq!(lex_all("x_1 9+`y'", LexMode::LocalMacro), [
            (IDENT, "x_1"),
            (MACRO_TEXT, " "),
            (NUMBER, "9"),
            (MACRO_TEXT, "+"),
            (BACKTICK, "`"),
            (IDENT, "y"),
            (QUOTE, "'"),
        ]);
    }

    #[test]
    fn test_mata_head_mode() {
        assert_eq!(lex_all(": x = 1\n", LexMode::MataHead), [
            (COLON, ":"),
            (MATA_CONTENT, "x = 1"),
            (NEWLINE, "\n")
        ]);
        assert_eq!(lex_all(" {", LexMode::MataHead), [(LEFT_BRACE, "{")]);
    }

    #[test]
    fn test_mata_line_mode() {
        assert_eq!(lex_all("x = 1\n  end  \nendx", LexMode::MataLine), [
            (MATA_CONTENT, "x = 1"),
            (NEWLINE, "\n"),
            (CONTROL_KEYWORD, "end"),
            (NEWLINE, "\n"),
            (MATA_CONTENT, "endx"),
        ]);
    }

    #[test]
    fn test_mata_end_before_comment() {
        for text in ["end // done", "end/* done */", "  end\t/// more"] {
            let mut tokenizer = Tokenizer::with_mode(text, LexMode::MataLine);
            let end = tokenizer.next_token(LexMode::Statement);
            assert_eq!((end.kind, &text[end.kind_range]), (CONTROL_KEYWORD, "end"));
            let comment = tokenizer.peek().kind;
            assert!(comment.is_comment(), "{text:?}: {comment:?}");
        }
        assert_eq!(lex_all("end * no", LexMode::MataLine), [(MATA_CONTENT, "end * no")]);
    }

    #[test]
    fn test_mata_brace_mode() {
        assert_eq!(lex_all("x = {1}\n y }", LexMode::MataBrace), [
            (MATA_CONTENT, "x = {1}\n y "),
            (RIGHT_BRACE, "}")
        ]);
        assert_eq!(lex_all("}", LexMode::MataBrace), [(RIGHT_BRACE, "}")]);
    }

    #[test]
    fn test_relex_switches_mode() {
        let text = "`x'";
        let mut tokenizer = Tokenizer::new(text);
        assert_eq!(tokenizer.next_token(LexMode::LocalMacro).kind, BACKTICK);
        assert_eq!(tokenizer.peek().kind, IDENT);
        tokenizer.relex(LexMode::GlobalMacro);
        assert_eq!(tokenizer.peek().kind, IDENT);
        assert_eq!(tokenizer.next_token(LexMode::LocalMacro).kind, IDENT);
        assert_eq!(tokenizer.peek().kind, QUOTE);
        tokenizer.relex(LexMode::Statement);
        assert_eq!(tokenizer.peek().kind, OTHER);
    }

    #[test]
    fn test_leading_whitespace_is_recorded() {
        let mut tokenizer = Tokenizer::new("x \t y");
        let x = tokenizer.next_token(LexMode::Statement);
        assert_eq!(x.leading, TextSize::new(0));
        let y = tokenizer.next_token(LexMode::Statement);
        assert_eq!(y.leading, TextSize::new(3));
        assert_eq!(tokenizer.token_text(&y), "y");
    }
}
