// Fixture loading utilities for test data
// JSON payloads captured from the API and Terraform state files

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Load a JSON fixture from the tests/fixtures/ directory
///
/// # Panics
/// Panics if the fixture file doesn't exist or contains invalid JSON
pub fn load_fixture(name: &str) -> Value {
    serde_json::from_str(&load_fixture_str(name))
        .unwrap_or_else(|e| panic!("Failed to parse fixture {} as JSON: {}", name, e))
}

/// Load a fixture file as a raw string (not parsed as JSON)
pub fn load_fixture_str(name: &str) -> String {
    let fixture_path = format!("tests/fixtures/{}.json", name);
    fs::read_to_string(&fixture_path)
        .unwrap_or_else(|_| panic!("Failed to read fixture file: {}", fixture_path))
}

pub fn fixture_exists(name: &str) -> bool {
    Path::new(&format!("tests/fixtures/{}.json", name)).exists()
}

/// Write `content` to a temporary state file that lives as long as the handle.
pub fn write_state_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp state file");
    file.write_all(content.as_bytes()).expect("write temp state file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_exists_check() {
        assert!(fixture_exists("monitor"));
        assert!(!fixture_exists("no_such_fixture"));
    }

    #[test]
    fn test_write_state_file() {
        let file = write_state_file("{}");
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "{}");
    }
}
