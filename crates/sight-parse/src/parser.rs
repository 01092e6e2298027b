use drop_bomb::DropBomb;
use sight_errors::{Diagnostic, DiagnosticKind};
use sight_syntax::{Builder, SyntaxKind, SyntaxSet, SyntaxTree};
use sight_tokenizer::{LexMode, Token, Tokenizer};
use text_size::TextRange;

/// Identifier-shaped token classes. Any of them can be a statement keyword or
/// a name, depending on where it appears.
pub(crate) const WORDS: SyntaxSet = SyntaxSet::new([
    SyntaxKind::IDENT,
    SyntaxKind::BUILTIN_VARIABLE,
    SyntaxKind::CONTROL_KEYWORD,
    SyntaxKind::TYPE_KEYWORD,
]);

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, tokenizer: Tokenizer::new(text), events: Vec::new(), diagnostics: Vec::new() }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    pub(crate) fn peek_range(&self) -> TextRange {
        self.tokenizer.peek().kind_range
    }

    pub(crate) fn peek_text(&self) -> &'a str {
        self.tokenizer.token_text(self.tokenizer.peek())
    }

    /// Source text after the lookahead token, up to the end of input.
    pub(crate) fn text_after_peek(&self) -> &'a str {
        &self.text[usize::from(self.peek_range().end())..]
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_end_of_line(&self) -> bool {
        matches!(self.peek_kind(), SyntaxKind::NEWLINE | SyntaxKind::EOF)
    }

    /// Whether the lookahead is a word spelled as one of `words`.
    pub(crate) fn at_word(&self, words: &[&str]) -> bool {
        WORDS.contains(self.peek_kind()) && words.contains(&self.peek_text())
    }

    /// Consumes the lookahead and reads the next token in `mode`.
    pub(crate) fn advance_in(&mut self, mode: LexMode) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let token = self.tokenizer.next_token(mode);
        self.events.push(Event::Token(token));
    }

    pub(crate) fn advance(&mut self) {
        self.advance_in(LexMode::Statement);
    }

    /// Consumes the lookahead under a different kind, e.g. a word that acts
    /// as a keyword in this position.
    pub(crate) fn advance_as(&mut self, kind: SyntaxKind, mode: LexMode) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let mut token = self.tokenizer.next_token(mode);
        token.kind = kind;
        self.events.push(Event::Token(token));
    }

    /// Pushes the end-of-input token, which carries any trailing whitespace.
    pub(crate) fn advance_eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        let token = self.tokenizer.peek().clone();
        self.events.push(Event::Token(token));
    }

    /// Reads the lookahead token again in `mode`.
    pub(crate) fn relex(&mut self, mode: LexMode) {
        self.tokenizer.relex(mode);
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    /// Records a diagnostic at the lookahead token.
    pub(crate) fn error(&mut self, kind: DiagnosticKind, message: &str) {
        let range = self.peek_range();
        self.error_at(kind, message, range);
    }

    /// Records a diagnostic and wraps the lookahead token in an `ERROR` node.
    pub(crate) fn error_and_bump(&mut self, kind: DiagnosticKind, message: &str) {
        let m = self.start();
        self.error(kind, message);
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn error_at(&mut self, kind: DiagnosticKind, message: &str, range: TextRange) {
        self.diagnostics.push(Diagnostic::new(kind, message, range));
    }

    pub(crate) fn build_tree(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { text, tokenizer: _, mut events, diagnostics } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();
        // Nodes wait here until their first token, so the whitespace in front
        // of that token stays with the enclosing node.
        let mut pending = Vec::new();
        let mut root_started = false;

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent, .. } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        if root_started {
                            pending.push(kind);
                        } else {
                            builder.start_node(kind);
                            root_started = true;
                        }
                    }
                }
                Event::Finish => {
                    for kind in pending.drain(..) {
                        builder.start_node(kind);
                    }
                    builder.finish_node();
                }
                Event::Token(Token { leading, kind, kind_range }) => {
                    builder.whitespace(leading);
                    for kind in pending.drain(..) {
                        builder.start_node(kind);
                    }
                    builder.token(kind, kind_range.len());
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        CompletedMarker { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
