//! Core data type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A file discovered by the directory walker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the repository root, `/`-separated
    pub relative_path: String,
}

impl FileRecord {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        match self.relative_path.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.relative_path,
        }
    }
}

/// Aggregate line count for one source extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStackStat {
    /// Lowercase extension including the leading dot, e.g. `.js`
    pub extension: String,
    pub line_count: usize,
}

/// Primary language of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "Node.js")]
    NodeJs,
    Python,
    Java,
    #[serde(rename = "C#")]
    CSharp,
    Go,
    Rust,
    #[serde(rename = "PHP")]
    Php,
    Ruby,
    #[serde(rename = "JavaScript/TypeScript")]
    JavaScriptTypeScript,
    #[serde(rename = "Web (HTML/CSS)")]
    Web,
    #[serde(rename = "C/C++")]
    CCpp,
    Swift,
    Kotlin,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::NodeJs => "Node.js",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
            Language::JavaScriptTypeScript => "JavaScript/TypeScript",
            Language::Web => "Web (HTML/CSS)",
            Language::CCpp => "C/C++",
            Language::Swift => "Swift",
            Language::Kotlin => "Kotlin",
            Language::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web framework recognised from declared dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "Express.js")]
    Express,
    #[serde(rename = "Next.js")]
    NextJs,
    #[serde(rename = "NestJS")]
    NestJs,
    Koa,
    Fastify,
    Flask,
    Django,
    #[serde(rename = "FastAPI")]
    FastApi,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Express => "Express.js",
            Framework::NextJs => "Next.js",
            Framework::NestJs => "NestJS",
            Framework::Koa => "Koa",
            Framework::Fastify => "Fastify",
            Framework::Flask => "Flask",
            Framework::Django => "Django",
            Framework::FastApi => "FastAPI",
        }
    }

    /// Conventional port the framework listens on out of the box
    pub fn default_port(&self) -> u16 {
        match self {
            Framework::Express
            | Framework::NextJs
            | Framework::NestJs
            | Framework::Koa
            | Framework::Fastify => 3000,
            Framework::Flask => 5000,
            Framework::Django | Framework::FastApi => 8000,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts inferred from manifest files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFacts {
    pub language: Option<Language>,
    pub framework: Option<Framework>,
    pub entry_point: Option<String>,
    pub start_script: Option<String>,
    pub declared_dependencies: Vec<String>,
    /// Runtime name (`node`, `python`) to declared version constraint
    pub runtime_version_hints: BTreeMap<String, String>,
    pub exposed_port: Option<u16>,
}

impl ManifestFacts {
    /// Set the language unless a higher-priority signal already did
    pub fn set_language_once(&mut self, language: Language) -> bool {
        if self.language.is_some() {
            return false;
        }
        self.language = Some(language);
        true
    }

    pub fn set_framework(&mut self, framework: Framework) {
        self.framework = Some(framework);
        self.exposed_port = Some(framework.default_port());
    }

    pub fn language_or_unknown(&self) -> Language {
        self.language.unwrap_or(Language::Unknown)
    }
}

/// A credential-shaped literal found in a tracked file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub file: String,
    pub reason: String,
}

impl fmt::Display for SecurityFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Potential secret/API key exposure in file: {} ({})",
            self.file, self.reason
        )
    }
}

/// Aggregate result of one analysis run
///
/// Fields are read-only once built; `secure` is always derived from `findings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    files: Vec<FileRecord>,
    tech_stack: Vec<TechStackStat>,
    manifest: ManifestFacts,
    has_dockerfile: bool,
    has_readme: bool,
    secure: bool,
    findings: Vec<SecurityFinding>,
    suggestions: Vec<String>,
}

impl AnalysisResult {
    pub fn new(
        files: Vec<FileRecord>,
        tech_stack: Vec<TechStackStat>,
        manifest: ManifestFacts,
        has_dockerfile: bool,
        has_readme: bool,
        findings: Vec<SecurityFinding>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            files,
            tech_stack,
            manifest,
            has_dockerfile,
            has_readme,
            secure: findings.is_empty(),
            findings,
            suggestions,
        }
    }

    /// Same analysis with a fresh set of findings; `secure` is re-derived
    pub fn with_findings(self, findings: Vec<SecurityFinding>) -> Self {
        Self {
            secure: findings.is_empty(),
            findings,
            ..self
        }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn tech_stack(&self) -> &[TechStackStat] {
        &self.tech_stack
    }

    pub fn manifest(&self) -> &ManifestFacts {
        &self.manifest
    }

    pub fn has_dockerfile(&self) -> bool {
        self.has_dockerfile
    }

    pub fn has_readme(&self) -> bool {
        self.has_readme
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn findings(&self) -> &[SecurityFinding] {
        &self.findings
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn total_lines(&self) -> usize {
        self.tech_stack.iter().map(|s| s.line_count).sum()
    }
}

/// System/user prompt pair handed to the text-generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Readme,
    Dockerfile,
    DockerIgnore,
}

impl ArtifactKind {
    /// File name the artifact is written to at the repository root
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Readme => "README.md",
            ArtifactKind::Dockerfile => "Dockerfile",
            ArtifactKind::DockerIgnore => ".dockerignore",
        }
    }
}

/// A file materialized into the analyzed tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub path: String,
    pub content: String,
}
