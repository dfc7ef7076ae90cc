use std::path::Path;

use bzw_dsl::ReaderConfig;

/// A single file prints as one document; a directory prints as an array of
/// `{ "file", "document" }` entries.
pub fn run(path: &Path, config: &ReaderConfig, compact: bool) -> Result<(), String> {
    let documents = super::read_documents(path, config)?;

    let value = if path.is_dir() {
        let entries: Vec<_> = documents
            .iter()
            .map(|(file, document)| {
                serde_json::json!({
                    "file": file.display().to_string(),
                    "document": document,
                })
            })
            .collect();
        serde_json::to_value(entries)
    } else {
        serde_json::to_value(documents.first().map(|(_, document)| document))
    }
    .map_err(|e| format!("JSON serialization error: {e}"))?;

    let json = if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    }
    .map_err(|e| format!("JSON serialization error: {e}"))?;

    println!("{json}");
    Ok(())
}
