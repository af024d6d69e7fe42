//! CLI utility functions.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    // Anything that would print as "1024.0 KB" is shown in MB instead.
    const KB_TO_MB_ROUNDING_THRESHOLD: usize = 1_048_525;

    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < KB_TO_MB_ROUNDING_THRESHOLD {
        format!("{:.1} KB", bytes as f64 / KB)
    } else {
        format!("{:.2} MB", bytes as f64 / MB)
    }
}

/// Read and deserialize a JSON document from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {what}: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {what} JSON: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn switches_units_before_1024_kb() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert!(format_bytes(1_048_524).ends_with("KB"));
        assert_eq!(format_bytes(1_048_525), "1.00 MB");
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pages": []}}"#).unwrap();
        let value: serde_json::Value = read_json(file.path(), "task").unwrap();
        assert_eq!(value["pages"], serde_json::json!([]));
    }

    #[test]
    fn parse_error_names_the_file_kind() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_json::<serde_json::Value>(file.path(), "asset pool").unwrap_err();
        assert!(
            err.to_string().starts_with("Failed to parse asset pool JSON"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_json::<serde_json::Value>(Path::new("/nonexistent/task.json"), "task")
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open task"));
    }
}
