pub mod check;
pub mod dump;
pub mod fmt;
pub mod list;

use std::path::{Path, PathBuf};

use bzw_core::Document;
use bzw_dsl::diagnostics::{Diagnostic, render_diagnostics};
use bzw_dsl::{ReadError, ReaderConfig};

/// Parse a file, or every matching file in a directory.
/// Syntax errors are rendered to stderr before the error is returned.
fn read_documents(path: &Path, config: &ReaderConfig) -> Result<Vec<(PathBuf, Document)>, String> {
    bzw_dsl::parse_path(path, config).map_err(report)
}

/// Render a read error's diagnostics, if it has any, and return its message.
fn report(err: ReadError) -> String {
    if let ReadError::Syntax {
        path,
        text,
        diagnostics,
        ..
    } = &err
    {
        print_diagnostics(path, text, diagnostics);
    }
    err.to_string()
}

/// Print diagnostics to stderr using ariadne.
fn print_diagnostics(path: &Path, text: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let filename = path.display().to_string();
    let rendered = render_diagnostics(text, &filename, diagnostics);
    eprint!("{rendered}");

    let errors = diagnostics.len();
    eprintln!("  {} error{}", errors, if errors == 1 { "" } else { "s" });
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
