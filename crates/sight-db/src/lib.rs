//! Incremental database over Stata source files.
//!
//! A [`File`] is a salsa input; its syntax tree and line index are tracked
//! queries, so editing the text re-runs only what depends on it.

use camino::Utf8PathBuf;
pub use line_index::{LineCol, LineIndex};
use salsa::{Accumulator as _, Database};
pub use sight_errors::Diagnostic;
use sight_parse::Parse;

#[salsa::db]
#[derive(Clone, Default)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl Database for RootDatabase {}

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref))]
    pub fn parse(self, db: &dyn Database) -> Parse {
        let _span = tracing::debug_span!("parse", path = %self.path(db)).entered();
        let parse = sight_parse::parse(self.text(db));
        tracing::debug!(diagnostics = parse.diagnostics().len(), "parsed");
        parse
    }

    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}

/// Parses `file` and accumulates its [`Diagnostic`]s.
#[salsa::tracked]
pub fn check_file(db: &dyn Database, file: File) {
    for diagnostic in file.parse(db).diagnostics() {
        diagnostic.clone().accumulate(db);
    }
}

/// Diagnostics of `file`, ordered by position.
pub fn diagnostics(db: &dyn Database, file: File) -> Vec<Diagnostic> {
    let mut diagnostics =
        check_file::accumulated::<Diagnostic>(db, file).into_iter().cloned().collect::<Vec<_>>();
    diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
    diagnostics
}
