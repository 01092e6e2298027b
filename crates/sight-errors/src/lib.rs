use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// Broad class of a syntax problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A character that cannot start any token.
    LexError,
    /// A string, macro, comment or block that reached a line end or the end
    /// of input without its closing delimiter.
    UnterminatedConstruct,
    /// A statement that is out of place or incomplete.
    StructuralError,
}

impl DiagnosticKind {
    /// Short code shown next to rendered messages.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::LexError => "lex",
            DiagnosticKind::UnterminatedConstruct => "unterminated",
            DiagnosticKind::StructuralError => "structure",
        }
    }
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[salsa::accumulator]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, range: TextRange) -> Self {
        Self { kind, message: message.into(), range }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).id(self.kind.code()).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

#[cfg(test)]
mod tests {
    use text_size::{TextRange, TextSize};

    use super::*;

    #[test]
    fn render_points_at_the_range() {
        let text = "display \"open\n";
        let range = TextRange::at(TextSize::new(8), TextSize::new(5));
        let diagnostic =
            Diagnostic::new(DiagnosticKind::UnterminatedConstruct, "unterminated string", range);

        let rendered = diagnostic.render(&Renderer::plain(), "a.do", text).to_string();
        assert!(rendered.contains("error[unterminated]: unterminated string"), "{rendered}");
        assert!(rendered.contains("a.do"), "{rendered}");
        assert!(rendered.contains("here"), "{rendered}");
    }

    #[test]
    fn accessors() {
        let range = TextRange::empty(TextSize::new(3));
        let diagnostic = Diagnostic::new(DiagnosticKind::LexError, "unexpected character", range);
        assert_eq!(diagnostic.kind(), DiagnosticKind::LexError);
        assert_eq!(diagnostic.message(), "unexpected character");
        assert_eq!(diagnostic.range(), range);
        assert_eq!(diagnostic.kind().to_string(), "lex");
    }
}
