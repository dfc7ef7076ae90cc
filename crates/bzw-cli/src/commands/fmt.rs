use std::path::Path;

pub fn run(file: &Path, output: Option<&Path>) -> Result<(), String> {
    if file.is_dir() {
        return Err(format!("{} is a directory; fmt takes a single file", file.display()));
    }

    let document = bzw_dsl::parse_file(file).map_err(super::report)?;
    let content = document.to_string();

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Wrote {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}
