//! File filtering utilities for repository walks
//!
//! Every predicate here answers "keep this file?" for a bare file name.

use crate::languages::extension_of;

/// Manifest files whose contents are handed to the README generator
const PROMPT_MANIFESTS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "composer.json",
    "Gemfile",
];

/// Extensions the secret scanner opens
const INSPECTABLE_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".py", ".json", ".yaml", ".yml", ".config", ".ini", ".php", ".rb", ".go",
    ".java", ".cs", ".cpp", ".c", ".swift", ".kt",
];

/// Files that are never reported by the secret scanner
const SCAN_EXEMPT_FILES: &[&str] = &["README.md", "LICENSE"];

/// Manifest and Markdown files used as README generation input
pub fn is_prompt_source(file_name: &str) -> bool {
    PROMPT_MANIFESTS.contains(&file_name) || extension_of(file_name).as_deref() == Some(".md")
}

/// Environment files are the sanctioned place for secrets
pub fn is_env_file(file_name: &str) -> bool {
    file_name == ".env" || file_name.starts_with(".env.") || file_name.ends_with(".env")
}

/// Code or config file the secret scanner should open
pub fn is_inspectable(file_name: &str) -> bool {
    if is_env_file(file_name) || SCAN_EXEMPT_FILES.contains(&file_name) {
        return false;
    }

    extension_of(file_name)
        .map(|ext| INSPECTABLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_sources() {
        assert!(is_prompt_source("package.json"));
        assert!(is_prompt_source("CHANGELOG.md"));
        assert!(is_prompt_source("NOTES.MD"));
        assert!(!is_prompt_source("index.js"));
        assert!(!is_prompt_source("package-lock.json"));
    }

    #[test]
    fn env_files_are_not_inspected() {
        assert!(!is_inspectable(".env"));
        assert!(!is_inspectable(".env.example"));
        assert!(!is_inspectable("production.env"));
        assert!(!is_inspectable("README.md"));
        assert!(!is_inspectable("LICENSE"));
        assert!(!is_inspectable("logo.png"));
        assert!(is_inspectable("config.js"));
        assert!(is_inspectable("settings.YAML"));
        assert!(is_inspectable("app.config"));
    }
}
