use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::Context as _;
use camino::Utf8PathBuf;
use clap::Parser;
use sight_db::{File, RootDatabase, diagnostics};
use sight_errors::Renderer;
use sight_ide::Analysis;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Parse and inspect Stata scripts.
#[derive(Parser)]
#[command(version)]
enum Options {
    /// Print the syntax tree of a file, followed by its diagnostics.
    Tree { path: Utf8PathBuf },
    /// Report syntax errors. Exits with a failure status if there are any.
    Check { path: Utf8PathBuf },
    /// Print the highlight capture of every classified range.
    Highlight { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("SIGHT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let analysis = Analysis::default();
    let db = analysis.db();

    match Options::parse() {
        Options::Tree { path } => {
            let file = open(db, path)?;
            print!("{}", file.parse(db).debug_dump());
            Ok(ExitCode::SUCCESS)
        }
        Options::Check { path } => {
            let file = open(db, path)?;
            let diagnostics = diagnostics(db, file);
            tracing::info!(count = diagnostics.len(), path = %file.path(db), "checked");

            let renderer = renderer(std::io::stderr().is_terminal());
            let path = file.path(db).as_str();
            let text = file.text(db);
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path, text));
            }

            Ok(if diagnostics.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Options::Highlight { path } => {
            let file = open(db, path)?;
            let text = file.text(db);
            for range in analysis.highlight(file) {
                println!(
                    "{}..{} {} {:?}",
                    u32::from(range.range.start()),
                    u32::from(range.range.end()),
                    range.capture.name(),
                    &text[range.range],
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Colored output only when it goes to a terminal.
fn renderer(terminal: bool) -> Renderer {
    if terminal { Renderer::styled() } else { Renderer::plain() }
}

fn open(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    tracing::debug!(%path, bytes = text.len(), "read");
    Ok(File::new(db, path, text))
}

#[cfg(test)]
mod tests {
    use sight_errors::{Diagnostic, DiagnosticKind, TextRange};

    use super::renderer;

    fn render(terminal: bool) -> String {
        let text = "display \"open\n";
        let range = TextRange::new(8.into(), 13.into());
        let diagnostic =
            Diagnostic::new(DiagnosticKind::UnterminatedConstruct, "unterminated string", range);
        diagnostic.render(&renderer(terminal), "a.do", text).to_string()
    }

    #[test]
    fn piped_output_has_no_escape_codes() {
        let plain = render(false);
        assert!(plain.contains("unterminated string"), "{plain}");
        assert!(!plain.contains('\x1b'), "{plain:?}");
    }

    #[test]
    fn terminal_output_is_styled() {
        assert!(render(true).contains('\x1b'));
    }
}
