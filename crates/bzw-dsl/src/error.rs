use std::path::PathBuf;

use crate::diagnostics;

/// Errors from reading world files off disk.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReadError {
    /// The file or directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    #[diagnostic(code(bzw::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid world file.
    #[error("{}:{line}:{column}: {message}", path.display())]
    #[diagnostic(code(bzw::syntax), help("run `bzw check` on the file for annotated errors"))]
    Syntax {
        /// Path of the file.
        path: PathBuf,
        /// Full source text, kept for rendering.
        text: String,
        /// Line of the first error, 1-based.
        line: usize,
        /// Column of the first error, 1-based.
        column: usize,
        /// Message of the first error.
        message: String,
        /// Every error found in the file, in source order.
        diagnostics: Vec<diagnostics::Diagnostic>,
    },

    /// A directory held no files with the configured extension.
    #[error("no .{extension} files found in {}", dir.display())]
    #[diagnostic(code(bzw::no_files))]
    NoFiles {
        /// Directory that was scanned.
        dir: PathBuf,
        /// Extension that was looked for.
        extension: String,
    },
}

impl ReadError {
    /// Build a syntax error, locating the first diagnostic in `text`.
    pub fn syntax(path: PathBuf, text: String, diagnostics: Vec<diagnostics::Diagnostic>) -> Self {
        let (offset, message) = diagnostics
            .first()
            .map_or((0, String::from("syntax error")), |d| (d.span.start, d.message.clone()));
        let (line, column) = diagnostics::line_col(&text, offset);
        Self::Syntax {
            path,
            text,
            line,
            column,
            message,
            diagnostics,
        }
    }
}
