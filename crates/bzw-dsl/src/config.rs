//! Options for reading world files from disk.

use std::path::Path;

/// How [`parse_dir`](crate::parse_dir) picks files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// File extension to match, without the dot. Compared ignoring ASCII case.
    pub extension: String,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            extension: "bzw".to_string(),
            recursive: false,
        }
    }
}

impl ReaderConfig {
    /// Set the file extension. A leading dot is ignored.
    pub fn with_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.extension = extension.as_ref().trim_start_matches('.').to_string();
        self
    }

    /// Enable or disable recursive directory traversal.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Whether `path` has the configured extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}
