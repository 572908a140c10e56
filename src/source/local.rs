//! Local JSON exports.

use super::normalize::parse_document;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Read all records from a single JSON file.
pub fn read_file(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let records = parse_document(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// List the `.json` files under `dir`, sorted by path.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry =
            entry.with_context(|| format!("Failed to walk directory {}", dir.display()))?;

        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if entry.file_type().is_file() && is_json {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Read records from every `.json` file under `dir`, one batch per file.
///
/// Files are visited in path order, so the result does not depend on
/// directory iteration order.
pub fn read_dir(dir: &Path) -> Result<Vec<(String, Vec<Value>)>> {
    let files = json_files(dir)?;
    info!("Found {} JSON files in {}", files.len(), dir.display());

    files
        .iter()
        .map(|file| -> Result<(String, Vec<Value>)> {
            Ok((file.display().to_string(), read_file(file)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blogs.json");
        fs::write(
            &path,
            r#"[{"title": "A", "author": "X", "url": "http://a", "likes": 1}]"#,
        )
        .unwrap();

        let records = read_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "A");
    }

    #[test]
    fn test_read_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_read_dir_is_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"title": "second"}]"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"blogs": [{"title": "first"}]}"#).unwrap();
        fs::write(
            dir.path().join("nested").join("c.json"),
            r#"[{"title": "third"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let batches = read_dir(dir.path()).unwrap();
        let titles: Vec<&str> = batches
            .iter()
            .flat_map(|(_, records)| records)
            .map(|r| r["title"].as_str().unwrap())
            .collect();

        assert_eq!(titles, vec!["first", "second", "third"]);
        assert!(batches[0].0.ends_with("a.json"));
        assert!(batches[2].0.ends_with("c.json"));
    }

    #[test]
    fn test_read_dir_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_dir(dir.path()).unwrap().is_empty());
    }
}
