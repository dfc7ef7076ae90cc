use std::path::Path;

use bzw_dsl::{ReadError, ReaderConfig};
use colored::Colorize;

use super::plural;

pub fn run(path: &Path, config: &ReaderConfig) -> Result<(), String> {
    let files = if path.is_dir() {
        let files = bzw_dsl::collect_files(path, config).map_err(|e| e.to_string())?;
        if files.is_empty() {
            return Err(ReadError::NoFiles {
                dir: path.to_path_buf(),
                extension: config.extension.clone(),
            }
            .to_string());
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    // Check every file, even after a failure
    let mut failed = 0;
    for file in &files {
        match bzw_dsl::parse_file(file) {
            Ok(doc) => {
                let counts = doc
                    .count_by_kind()
                    .iter()
                    .map(|(kind, n)| format!("{n} {kind}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "  {} {} ({}: {counts})",
                    "ok".green(),
                    file.display(),
                    plural(doc.len(), "object")
                );
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}", "FAIL".red().bold(), file.display());
                let message = super::report(e);
                eprintln!("  {message}");
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} failed to parse", plural(files.len(), "file")));
    }

    println!("  All checks passed ({}).", plural(files.len(), "file"));
    Ok(())
}
