use std::collections::BTreeMap;
use std::path::Path;

use bzw_core::ObjectKind;
use bzw_dsl::ReaderConfig;
use comfy_table::{ContentArrangement, Table};

use super::plural;

pub fn run(path: &Path, config: &ReaderConfig, kind: Option<&str>) -> Result<(), String> {
    let filter = kind
        .map(|k| k.parse::<ObjectKind>())
        .transpose()
        .map_err(|e| e.to_string())?;

    let documents = super::read_documents(path, config)?;
    let show_file = documents.len() > 1;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["#", "Kind", "Clauses", "Name"];
    if show_file {
        header.insert(0, "File");
    }
    table.set_header(header);

    let mut totals: BTreeMap<ObjectKind, usize> = BTreeMap::new();
    for (file, document) in &documents {
        for (index, object) in document.iter().enumerate() {
            if filter.is_some_and(|k| k != object.kind) {
                continue;
            }
            *totals.entry(object.kind).or_insert(0) += 1;

            let mut row = vec![
                index.to_string(),
                object.kind.to_string(),
                object.clauses.len().to_string(),
                object.name().unwrap_or("-").to_string(),
            ];
            if show_file {
                row.insert(0, file.display().to_string());
            }
            table.add_row(row);
        }
    }

    if totals.is_empty() {
        println!("  No objects found.");
        return Ok(());
    }

    println!("{table}");
    println!();
    for (kind, count) in &totals {
        println!("  {kind}: {count}");
    }
    println!("  {}", plural(totals.values().sum(), "object"));

    Ok(())
}
