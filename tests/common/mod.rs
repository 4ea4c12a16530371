/*!
 * Common test utilities for the changelog-translator test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use changelog_translator::app_config::Config;

/// Leading boundary marker used by the default configuration
pub const MARKER_BEFORE: &str = "};\n    return <ShowResult />;\n  })()}\n</div>";

/// Trailing boundary marker used by the default configuration
pub const MARKER_AFTER: &str = "{/* Component definitions - moved to end of file for cleaner code organization */}";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// One changelog entry wrapped in its component
pub fn entry(title: &str, body: &str) -> String {
    format!("<Update label=\"{}\">\n## {}\n{}\n</Update>\n", title, title, body)
}

/// A changelog page: component code, entries between the markers, more code
pub fn changelog_document(entries: &[String]) -> String {
    let body = entries.join("\n");
    format!(
        "import {{ Update }} from '@/components';\n\n<div>\n{{(() => {{\n  const data = {{\n    a: 1,\n  {}\n{}\n{}\nexport const ShowResult = () => null;\n",
        MARKER_BEFORE,
        body.trim(),
        MARKER_AFTER
    )
}

/// The part of a changelog page the markers leave untouched, split at the span
pub fn preserved_regions(document: &str) -> (String, String) {
    let before_end = document.find(MARKER_BEFORE).map(|i| i + MARKER_BEFORE.len()).unwrap_or(0);
    let after_start = document.find(MARKER_AFTER).unwrap_or(document.len());
    (document[..before_end].to_string(), document[after_start..].to_string())
}

/// Default configuration rooted in `root`, with a fast retry backoff
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.source_dir = root.join("en").join("changelog");
    config.output_root = root.to_path_buf();
    config.translation.common.retry_backoff_ms = 1;
    config
}
