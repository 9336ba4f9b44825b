//! Shared fixtures for repository analysis tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary tree from `(relative path, content)` pairs
pub fn repo_with(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (relative, content) in files {
        write_file(temp_dir.path(), relative, content);
    }
    temp_dir
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write fixture file");
}

/// Ten lines of a minimal Express server
pub fn express_index() -> String {
    [
        "const express = require('express');",
        "const app = express();",
        "",
        "app.get('/', (req, res) => {",
        "  res.send('ok');",
        "});",
        "",
        "app.listen(3000, () => {",
        "  console.log('listening');",
        "});",
    ]
    .join("\n")
}

pub const EXPRESS_PACKAGE_JSON: &str =
    r#"{"name":"demo","scripts":{"start":"node index.js"},"dependencies":{"express":"^4.19.0"}}"#;
