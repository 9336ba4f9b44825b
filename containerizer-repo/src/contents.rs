//! Reads the files that feed README generation

use containerizer_core::{process_concurrently, AnalysisResult, Language};
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::{debug, warn};

/// Collects file contents keyed by relative path
///
/// Read failures never abort collection: the failing entry holds an error
/// marker instead of the content, and the marker reaches the prompt verbatim.
#[derive(Debug, Clone)]
pub struct ContentCollector {
    max_concurrent_reads: usize,
}

impl ContentCollector {
    pub fn new(max_concurrent_reads: usize) -> Self {
        Self {
            max_concurrent_reads,
        }
    }

    pub async fn collect(&self, root: &Path, analysis: &AnalysisResult) -> BTreeMap<String, String> {
        let paths: Vec<String> = analysis
            .files()
            .iter()
            .map(|file| file.relative_path.clone())
            .collect();

        let read = process_concurrently(paths, self.max_concurrent_reads, |relative| {
            let path = root.join(&relative);
            async move {
                let content = match tokio::fs::read_to_string(&path).await {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(file = %relative, error = %e, "Failed to read file for prompt");
                        format!("Error reading file: {}", e)
                    }
                };
                (relative, content)
            }
        })
        .await;

        let mut contents: BTreeMap<String, String> = read.into_iter().collect();

        if let Some(entry_point) = node_entry_point(analysis) {
            let content = read_entry_point(root, &entry_point).await;
            contents.insert(entry_point, content);
        }

        debug!(root = %root.display(), files = contents.len(), "Collected prompt file contents");
        contents
    }
}

/// Entry point of a Node.js project, normalised relative to the root
fn node_entry_point(analysis: &AnalysisResult) -> Option<String> {
    let manifest = analysis.manifest();
    if manifest.language != Some(Language::NodeJs) {
        return None;
    }
    manifest
        .entry_point
        .as_deref()
        .map(|entry| entry.trim_start_matches("./").to_string())
        .filter(|entry| !entry.is_empty())
}

async fn read_entry_point(root: &Path, entry_point: &str) -> String {
    let relative = Path::new(entry_point);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        warn!(entry_point = %entry_point, "Entry point points outside the repository");
        return "Error reading entry point: path is outside the repository".to_string();
    }

    match tokio::fs::read_to_string(root.join(relative)).await {
        Ok(content) => content,
        Err(e) => {
            warn!(entry_point = %entry_point, error = %e, "Failed to read entry point");
            format!("Error reading entry point: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use containerizer_core::{FileRecord, ManifestFacts};
    use std::fs;
    use tempfile::TempDir;

    fn analysis(files: &[&str], manifest: ManifestFacts) -> AnalysisResult {
        AnalysisResult::new(
            files.iter().map(|f| FileRecord::new(*f)).collect(),
            vec![],
            manifest,
            false,
            false,
            vec![],
            vec![],
        )
    }

    fn node_manifest(entry_point: &str) -> ManifestFacts {
        ManifestFacts {
            language: Some(Language::NodeJs),
            entry_point: Some(entry_point.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn collects_files_and_node_entry_point() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), "{\"main\": \"./server.js\"}").unwrap();
        fs::write(root.join("server.js"), "require('express')").unwrap();

        let contents = ContentCollector::new(4)
            .collect(root, &analysis(&["package.json"], node_manifest("./server.js")))
            .await;

        assert_eq!(contents.len(), 2);
        assert_eq!(contents["server.js"], "require('express')");
        assert!(contents["package.json"].contains("server.js"));
    }

    #[tokio::test]
    async fn unreadable_files_become_error_markers() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let contents = ContentCollector::new(4)
            .collect(root, &analysis(&["gone.md"], node_manifest("index.js")))
            .await;

        assert!(contents["gone.md"].starts_with("Error reading file: "));
        assert!(contents["index.js"].starts_with("Error reading entry point: "));
    }

    #[tokio::test]
    async fn entry_point_only_for_node_projects() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("main.py"), "print('hi')").unwrap();

        let manifest = ManifestFacts {
            language: Some(Language::Python),
            entry_point: Some("main.py".to_string()),
            ..Default::default()
        };
        let contents = ContentCollector::new(4).collect(root, &analysis(&[], manifest)).await;
        assert!(contents.is_empty());
    }

    #[tokio::test]
    async fn entry_point_cannot_escape_root() {
        let temp_dir = TempDir::new().unwrap();
        let contents = ContentCollector::new(4)
            .collect(temp_dir.path(), &analysis(&[], node_manifest("../secret.js")))
            .await;
        assert!(contents["../secret.js"].starts_with("Error reading entry point: "));
    }
}
