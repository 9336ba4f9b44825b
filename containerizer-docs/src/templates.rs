//! Dockerfile templates

use containerizer_core::{Language, ManifestFacts};
use std::fmt;

const DEFAULT_NODE_MAJOR: &str = "20";
const DEFAULT_PYTHON_VERSION: &str = "3.11";
const DEFAULT_NODE_PORT: u16 = 3000;
const DEFAULT_PYTHON_PORT: u16 = 5000;
const DEFAULT_PYTHON_ENTRY_POINT: &str = "main.py";

/// Contents of the generated `.dockerignore`
pub const DOCKERIGNORE: &str = ".git
node_modules
__pycache__
*.pyc
.DS_Store
.env
";

/// Dockerfile family chosen from the detected language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockerTemplate {
    Node,
    Python,
    Generic,
}

impl DockerTemplate {
    /// Every language has a template; languages without a dedicated one get `Generic`
    pub fn for_manifest(facts: &ManifestFacts) -> Self {
        match facts.language_or_unknown() {
            Language::NodeJs => DockerTemplate::Node,
            Language::Python => DockerTemplate::Python,
            _ => DockerTemplate::Generic,
        }
    }

    pub fn render(&self, facts: &ManifestFacts) -> String {
        match self {
            DockerTemplate::Node => render_node(facts),
            DockerTemplate::Python => render_python(facts),
            DockerTemplate::Generic => render_generic(),
        }
    }
}

impl fmt::Display for DockerTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DockerTemplate::Node => "node",
            DockerTemplate::Python => "python",
            DockerTemplate::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Dockerfile for the detected stack
pub fn render_dockerfile(facts: &ManifestFacts) -> String {
    DockerTemplate::for_manifest(facts).render(facts)
}

fn render_node(facts: &ManifestFacts) -> String {
    let major = facts
        .runtime_version_hints
        .get("node")
        .and_then(|hint| leading_version(hint, 1))
        .unwrap_or_else(|| DEFAULT_NODE_MAJOR.to_string());
    let port = facts.exposed_port.unwrap_or(DEFAULT_NODE_PORT);

    format!(
        "# Use official Node.js image
FROM node:{major}-alpine

WORKDIR /app

COPY package*.json ./

RUN npm install --production

COPY . .

EXPOSE {port}

CMD [\"npm\", \"start\"]
"
    )
}

fn render_python(facts: &ManifestFacts) -> String {
    let version = facts
        .runtime_version_hints
        .get("python")
        .and_then(|hint| leading_version(hint, 2))
        .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string());
    let port = facts.exposed_port.unwrap_or(DEFAULT_PYTHON_PORT);
    let entry_point = facts
        .entry_point
        .as_deref()
        .unwrap_or(DEFAULT_PYTHON_ENTRY_POINT);

    format!(
        "# Use official Python image
FROM python:{version}-slim

WORKDIR /app

COPY requirements.txt ./

RUN pip install --no-cache-dir -r requirements.txt

COPY . .

EXPOSE {port}

CMD [\"python\", \"{entry_point}\"]
"
    )
}

fn render_generic() -> String {
    "# Base image (update as needed)
FROM ubuntu:latest

WORKDIR /app

COPY . .

CMD [\"echo\", \"TODO: Add commands to run your application\"]
"
    .to_string()
}

/// First `components` numeric parts of a version constraint (`>=18.2` -> `18`)
fn leading_version(constraint: &str, components: usize) -> Option<String> {
    let start = constraint.find(|c: char| c.is_ascii_digit())?;
    let parts: Vec<&str> = constraint[start..]
        .split('.')
        .map(|part| {
            let end = part
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(part.len());
            &part[..end]
        })
        .take_while(|part| !part.is_empty())
        .take(components)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}
