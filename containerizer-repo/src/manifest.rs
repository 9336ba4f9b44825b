//! Manifest-based language, framework and dependency detection
//!
//! Detection runs a fixed priority cascade and stops at the first family that
//! matches:
//!
//! 1. `package.json` (Node.js)
//! 2. `requirements.txt` (Python)
//! 3. marker files for Java, C#, Go, Rust, PHP and Ruby
//! 4. the most common recognised extension in the tree

use crate::languages::{extension_of, fallback_language};
use crate::walker::DirectoryWalker;
use containerizer_core::{Framework, Language, ManifestFacts};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

pub const START_SCRIPT_SUGGESTION: &str = "Consider adding a \"start\" script to package.json.";
pub const README_SUGGESTION: &str = "Consider adding a README.md file.";
pub const DOCKERFILE_SUGGESTION: &str = "Consider adding a Dockerfile.";

const DEFAULT_NODE_ENTRY_POINT: &str = "index.js";

/// Checked in order; the first dependency present decides the framework
const NODE_FRAMEWORKS: &[(&str, Framework)] = &[
    ("@nestjs/core", Framework::NestJs),
    ("next", Framework::NextJs),
    ("express", Framework::Express),
    ("fastify", Framework::Fastify),
    ("koa", Framework::Koa),
];

const PYTHON_FRAMEWORKS: &[(&str, Framework)] = &[
    ("django", Framework::Django),
    ("fastapi", Framework::FastApi),
    ("flask", Framework::Flask),
];

const PYTHON_ENTRY_POINTS: &[&str] = &["main.py", "app.py", "manage.py", "run.py", "wsgi.py"];

/// Root-level evidence of a language, checked in order
#[derive(Debug, Clone, Copy)]
enum Marker {
    File(&'static str),
    /// Any root file with this suffix, e.g. `App.csproj`
    Suffix(&'static str),
}

const MARKERS: &[(Marker, Language)] = &[
    (Marker::File("pom.xml"), Language::Java),
    (Marker::File("build.gradle"), Language::Java),
    (Marker::File("build.gradle.kts"), Language::Java),
    (Marker::Suffix(".csproj"), Language::CSharp),
    (Marker::File("go.mod"), Language::Go),
    (Marker::File("Cargo.toml"), Language::Rust),
    (Marker::File("composer.json"), Language::Php),
    (Marker::File("Gemfile"), Language::Ruby),
];

static PYTHON_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?\s*python\s*((?:==|>=|<=|~=|!=|>|<|=)?\s*\d+(?:\.\d+)*(?:\.\*)?)\s*$")
        .expect("python version pattern is valid")
});

/// Everything the manifest inspection learns about a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestReport {
    pub facts: ManifestFacts,
    pub has_readme: bool,
    pub has_dockerfile: bool,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ManifestDetector {
    walker: DirectoryWalker,
}

impl ManifestDetector {
    pub fn new(walker: DirectoryWalker) -> Self {
        Self { walker }
    }

    /// Inspect manifests and root-level README/Dockerfile presence
    pub fn detect(&self, root: &Path) -> ManifestReport {
        let mut report = ManifestReport::default();

        let matched = self.detect_node(root, &mut report)
            || self.detect_python(root, &mut report.facts)
            || self.detect_marker_files(root, &mut report.facts)
            || self.detect_by_extension(root, &mut report.facts);

        if !matched {
            report.facts.set_language_once(Language::Unknown);
        }

        report.has_dockerfile = root.join("Dockerfile").is_file();
        report.has_readme = root.join("README.md").is_file();

        if !report.has_readme {
            report.suggestions.push(README_SUGGESTION.to_string());
        }
        if !report.has_dockerfile {
            report.suggestions.push(DOCKERFILE_SUGGESTION.to_string());
        }

        info!(
            root = %root.display(),
            language = %report.facts.language_or_unknown(),
            framework = ?report.facts.framework,
            dependencies = report.facts.declared_dependencies.len(),
            "Manifest detection finished"
        );

        report
    }

    fn detect_node(&self, root: &Path, report: &mut ManifestReport) -> bool {
        let Some(content) = read_optional(&root.join("package.json")) else {
            return false;
        };

        // Any JSON document but `null` marks a Node project; missing keys read as absent
        let package: Value = match serde_json::from_str(&content) {
            Ok(Value::Null) => {
                warn!("package.json holds null, ignoring it");
                return false;
            }
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Malformed package.json, ignoring it");
                return false;
            }
        };

        let facts = &mut report.facts;
        facts.set_language_once(Language::NodeJs);
        facts.start_script = package["scripts"]["start"]
            .as_str()
            .filter(|script| !script.is_empty())
            .map(str::to_string);
        facts.entry_point = Some(
            package["main"]
                .as_str()
                .filter(|main| !main.is_empty())
                .unwrap_or(DEFAULT_NODE_ENTRY_POINT)
                .to_string(),
        );
        facts.declared_dependencies = package["dependencies"]
            .as_object()
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default();

        if let Some(node) = package["engines"]["node"].as_str() {
            facts
                .runtime_version_hints
                .insert("node".to_string(), node.to_string());
        }

        if let Some((_, framework)) = NODE_FRAMEWORKS
            .iter()
            .find(|(name, _)| facts.declared_dependencies.iter().any(|d| d == name))
        {
            facts.set_framework(*framework);
        }

        if facts.start_script.is_none() {
            report.suggestions.push(START_SCRIPT_SUGGESTION.to_string());
        }

        true
    }

    fn detect_python(&self, root: &Path, facts: &mut ManifestFacts) -> bool {
        let Some(content) = read_optional(&root.join("requirements.txt")) else {
            return false;
        };

        facts.set_language_once(Language::Python);

        let mut requirements = Vec::new();
        for line in content.lines().map(str::trim) {
            if let Some(captures) = PYTHON_VERSION.captures(line) {
                let constraint: String = captures[1].split_whitespace().collect();
                facts
                    .runtime_version_hints
                    .insert("python".to_string(), constraint);
                continue;
            }
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            requirements.push(line.to_string());
        }

        let names: Vec<String> = requirements.iter().map(|r| requirement_name(r)).collect();
        if let Some((_, framework)) = PYTHON_FRAMEWORKS
            .iter()
            .find(|(marker, _)| names.iter().any(|n| n == marker))
        {
            facts.set_framework(*framework);
        }

        facts.declared_dependencies = requirements;
        facts.entry_point = PYTHON_ENTRY_POINTS
            .iter()
            .find(|candidate| root.join(candidate).is_file())
            .map(|candidate| candidate.to_string());

        true
    }

    fn detect_marker_files(&self, root: &Path, facts: &mut ManifestFacts) -> bool {
        let present = MARKERS.iter().find(|(marker, _)| match marker {
            Marker::File(name) => root.join(name).is_file(),
            Marker::Suffix(suffix) => has_root_file_with_suffix(root, suffix),
        });

        match present {
            Some((marker, language)) => {
                debug!(marker = ?marker, language = %language, "Found language marker");
                facts.set_language_once(*language)
            }
            None => false,
        }
    }

    fn detect_by_extension(&self, root: &Path, facts: &mut ManifestFacts) -> bool {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for file in self.walker.walk(root, None) {
            if let Some(ext) = extension_of(file.file_name()) {
                if fallback_language(&ext).is_some() {
                    *counts.entry(ext).or_insert(0) += 1;
                }
            }
        }

        // Highest count wins, the table order breaks ties
        let best = counts
            .iter()
            .filter_map(|(ext, count)| fallback_language(ext).map(|(rank, lang)| (*count, rank, lang)))
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        match best {
            Some((count, _, language)) => {
                debug!(language = %language, files = count, "Language inferred from extensions");
                facts.set_language_once(language)
            }
            None => false,
        }
    }
}

/// Read a file that may legitimately be missing
fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read manifest file");
            None
        }
    }
}

fn has_root_file_with_suffix(root: &Path, suffix: &str) -> bool {
    std::fs::read_dir(root)
        .map(|entries| {
            entries
                .flatten()
                .any(|entry| entry.file_name().to_string_lossy().ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Lowercase distribution name of a requirement line (`Flask[async]>=2.0` -> `flask`)
fn requirement_name(requirement: &str) -> String {
    requirement
        .split(|c: char| "=<>!~;[ @".contains(c))
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn detect(root: &Path) -> ManifestReport {
        ManifestDetector::default().detect(root)
    }

    #[test]
    fn node_package_with_express() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join("package.json"),
            r#"{"name":"x","main":"server.js","scripts":{"start":"node server.js"},
               "engines":{"node":">=18"},"dependencies":{"express":"^4.0.0","cors":"^2.8.5"}}"#,
        )
        .unwrap();

        let report = detect(root);
        let facts = &report.facts;
        assert_eq!(facts.language, Some(Language::NodeJs));
        assert_eq!(facts.framework, Some(Framework::Express));
        assert_eq!(facts.exposed_port, Some(3000));
        assert_eq!(facts.entry_point.as_deref(), Some("server.js"));
        assert_eq!(facts.start_script.as_deref(), Some("node server.js"));
        assert_eq!(facts.runtime_version_hints.get("node").map(String::as_str), Some(">=18"));
        assert_eq!(facts.declared_dependencies.len(), 2);
        assert!(!report.suggestions.iter().any(|s| s == START_SCRIPT_SUGGESTION));
    }

    #[test]
    fn node_defaults_and_start_script_suggestion() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), r#"{"name":"x"}"#).unwrap();
        fs::write(root.join("README.md"), "# x").unwrap();

        let report = detect(root);
        assert_eq!(report.facts.entry_point.as_deref(), Some("index.js"));
        assert!(report.facts.declared_dependencies.is_empty());
        assert!(report.has_readme);
        assert_eq!(
            report.suggestions,
            vec![START_SCRIPT_SUGGESTION.to_string(), DOCKERFILE_SUGGESTION.to_string()]
        );
    }

    #[test]
    fn empty_start_script_and_main_count_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), r#"{"main":"","scripts":{"start":""}}"#).unwrap();

        let report = detect(root);
        assert_eq!(report.facts.start_script, None);
        assert_eq!(report.facts.entry_point.as_deref(), Some("index.js"));
        assert!(report.suggestions.iter().any(|s| s == START_SCRIPT_SUGGESTION));
    }

    #[test]
    fn non_object_package_json_still_marks_node() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), "[]").unwrap();
        fs::write(root.join("requirements.txt"), "flask\n").unwrap();

        let report = detect(root);
        assert_eq!(report.facts.language, Some(Language::NodeJs));
        assert_eq!(report.facts.entry_point.as_deref(), Some("index.js"));
        assert!(report.facts.declared_dependencies.is_empty());
    }

    #[test]
    fn package_descriptor_beats_requirements() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), r#"{"dependencies":{}}"#).unwrap();
        fs::write(root.join("requirements.txt"), "flask==2.0\n").unwrap();

        let facts = detect(root).facts;
        assert_eq!(facts.language, Some(Language::NodeJs));
        assert_eq!(facts.framework, None);
    }

    #[test]
    fn malformed_package_json_falls_through() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), "{ not json").unwrap();
        fs::write(root.join("requirements.txt"), "Django>=4.2\n").unwrap();

        let facts = detect(root).facts;
        assert_eq!(facts.language, Some(Language::Python));
        assert_eq!(facts.framework, Some(Framework::Django));
        assert_eq!(facts.exposed_port, Some(8000));
    }

    #[test]
    fn python_requirements_are_parsed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join("requirements.txt"),
            "# web stack\n# python 3.12\n\nFlask[async]>=2.0\n  requests==2.31.0  \npython-dotenv\n",
        )
        .unwrap();
        fs::write(root.join("app.py"), "app = None").unwrap();

        let facts = detect(root).facts;
        assert_eq!(facts.language, Some(Language::Python));
        assert_eq!(facts.framework, Some(Framework::Flask));
        assert_eq!(facts.exposed_port, Some(5000));
        assert_eq!(
            facts.declared_dependencies,
            vec!["Flask[async]>=2.0", "requests==2.31.0", "python-dotenv"]
        );
        assert_eq!(facts.runtime_version_hints.get("python").map(String::as_str), Some("3.12"));
        assert_eq!(facts.entry_point.as_deref(), Some("app.py"));
    }

    #[test]
    fn python_version_constraint_keeps_operator() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("requirements.txt"), "python >= 3.9\nfastapi\n").unwrap();

        let facts = detect(root).facts;
        assert_eq!(facts.runtime_version_hints.get("python").map(String::as_str), Some(">=3.9"));
        assert_eq!(facts.declared_dependencies, vec!["fastapi"]);
        assert_eq!(facts.framework, Some(Framework::FastApi));
        assert_eq!(facts.entry_point, None);
    }

    #[test]
    fn marker_files_in_priority_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("go.mod"), "module x").unwrap();
        fs::write(root.join("Gemfile"), "source 'https://rubygems.org'").unwrap();
        assert_eq!(detect(root).facts.language, Some(Language::Go));

        fs::write(root.join("App.csproj"), "<Project />").unwrap();
        assert_eq!(detect(root).facts.language, Some(Language::CSharp));

        fs::write(root.join("pom.xml"), "<project />").unwrap();
        assert_eq!(detect(root).facts.language, Some(Language::Java));
    }

    #[test]
    fn falls_back_to_most_common_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.py"), "").unwrap();
        fs::write(root.join("src/b.py"), "").unwrap();
        fs::write(root.join("src/c.js"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        assert_eq!(detect(root).facts.language, Some(Language::Python));
    }

    #[test]
    fn extension_ties_follow_table_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.py"), "").unwrap();
        fs::write(root.join("b.js"), "").unwrap();

        assert_eq!(
            detect(root).facts.language,
            Some(Language::JavaScriptTypeScript)
        );
    }

    #[test]
    fn empty_tree_is_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let report = detect(temp_dir.path());
        assert_eq!(report.facts.language, Some(Language::Unknown));
        assert!(!report.has_readme);
        assert!(!report.has_dockerfile);
        assert_eq!(
            report.suggestions,
            vec![README_SUGGESTION.to_string(), DOCKERFILE_SUGGESTION.to_string()]
        );
    }
}
