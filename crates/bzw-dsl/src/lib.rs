//! Reader for BZFlag world files.
//!
//! Text goes through the [`lexer`] into tokens, then through the [`parser`]
//! into a [`Document`]. Parsing is all-or-nothing: any lexical or grammar
//! error fails the whole input and no partial document is returned.

pub mod config;
/// Syntax errors with source spans, and their terminal rendering.
pub mod diagnostics;
/// Errors from reading world files off disk.
pub mod error;
/// Tokenizer for world-file text.
pub mod lexer;
/// Grammar turning tokens into a document.
pub mod parser;

use std::path::{Path, PathBuf};

use bzw_core::Document;

pub use config::ReaderConfig;
pub use diagnostics::Diagnostic;
pub use error::ReadError;

/// Parse world-file text into a document.
///
/// Lexing keeps going past bad characters so every one is reported, but any
/// lexical error fails the parse even if the remaining tokens form a valid
/// document.
pub fn parse_source(source: &str) -> Result<Document, Vec<Diagnostic>> {
    let (tokens, lex_errors) = lexer::lex(source);

    let mut diagnostics: Vec<Diagnostic> = lex_errors.into_iter().map(Diagnostic::from).collect();

    match parser::parse(&tokens) {
        Ok(document) if diagnostics.is_empty() => {
            log::debug!("parsed {} objects", document.len());
            Ok(document)
        }
        Ok(_) => Err(diagnostics),
        Err(parse_errors) => {
            diagnostics.extend(parse_errors.into_iter().map(Diagnostic::from));
            diagnostics.sort_by_key(|d| d.span.start);
            Err(diagnostics)
        }
    }
}

/// Read and parse a single world file.
pub fn parse_file(path: &Path) -> Result<Document, ReadError> {
    log::debug!("reading {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_source(&text).map_err(|diagnostics| ReadError::syntax(path.to_path_buf(), text, diagnostics))
}

/// List the files in `dir` matching `config`, sorted by path.
pub fn collect_files(dir: &Path, config: &ReaderConfig) -> Result<Vec<PathBuf>, ReadError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|source| ReadError::Io {
            path: current.clone(),
            source,
        })?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                if config.recursive {
                    pending.push(path);
                }
            } else if config.matches(&path) {
                files.push(path);
            }
        }
    }

    // Sort for deterministic ordering
    files.sort();
    Ok(files)
}

/// Parse every matching file in a directory, each into its own document.
///
/// Stops at the first file that fails to read or parse.
pub fn parse_dir(dir: &Path, config: &ReaderConfig) -> Result<Vec<(PathBuf, Document)>, ReadError> {
    let files = collect_files(dir, config)?;
    if files.is_empty() {
        return Err(ReadError::NoFiles {
            dir: dir.to_path_buf(),
            extension: config.extension.clone(),
        });
    }

    log::debug!("found {} world files in {}", files.len(), dir.display());
    files
        .into_iter()
        .map(|path| parse_file(&path).map(|doc| (path, doc)))
        .collect()
}

/// Parse a file, or every matching file if `path` is a directory.
pub fn parse_path(path: &Path, config: &ReaderConfig) -> Result<Vec<(PathBuf, Document)>, ReadError> {
    if path.is_dir() {
        parse_dir(path, config)
    } else {
        parse_file(path).map(|doc| vec![(path.to_path_buf(), doc)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_source_reports_lex_errors_even_when_grammar_matches() {
        let diags = parse_source("box size 1 1 1 end ;").unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].span, 19..20);
    }

    #[test]
    fn parse_source_sorts_diagnostics() {
        let diags = parse_source("box size 1 1 ; end").unwrap_err();
        assert!(diags.len() >= 2);
        assert!(diags.windows(2).all(|w| w[0].span.start <= w[1].span.start));
    }

    #[test]
    fn parse_file_locates_first_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.bzw");
        fs::write(&path, "world size 400 end\n\nbox\n  radius 2\nend\n").unwrap();

        match parse_file(&path).unwrap_err() {
            ReadError::Syntax { line, column, diagnostics, .. } => {
                assert_eq!((line, column), (4, 3));
                assert!(!diagnostics.is_empty());
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn parse_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = parse_file(&dir.path().join("nope.bzw")).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read"));
    }

    #[test]
    fn parse_dir_reads_matching_files_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.bzw"), "box size 1 1 1 end").unwrap();
        fs::write(dir.path().join("a.bzw"), "world size 200 end").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a world").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.bzw"), "zone team 1 end").unwrap();

        let docs = parse_dir(dir.path(), &ReaderConfig::default()).unwrap();
        let names: Vec<_> = docs
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.bzw", "b.bzw"]);

        let docs = parse_dir(dir.path(), &ReaderConfig::default().with_recursive(true)).unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn parse_dir_without_matches_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = parse_dir(dir.path(), &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, ReadError::NoFiles { .. }));
    }

    #[test]
    fn parse_path_accepts_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.world");
        fs::write(&path, "waterLevel height 1 end").unwrap();
        let docs = parse_path(&path, &ReaderConfig::default()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].1.len(), 1);
    }
}
