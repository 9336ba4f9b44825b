//! Credential-shaped literal detection
//!
//! The patterns are heuristics: they look for an assignment of a quoted,
//! token-like literal to a name such as `API_KEY` or `SECRET`. References
//! like `process.env.API_KEY` carry no literal and are never reported.

use crate::filter::is_inspectable;
use crate::walker::DirectoryWalker;
use containerizer_core::{process_concurrently, SecurityFinding};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Pattern kind and its compiled expression, checked in order
static SECRET_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("API key assignment", r#"(?i)API[_-]?KEY\s*[=:]\s*['"][A-Za-z0-9_-]{16,}"#),
        ("secret assignment", r#"(?i)SECRET\s*[=:]\s*['"][A-Za-z0-9_-]{8,}"#),
        ("token assignment", r#"(?i)TOKEN\s*[=:]\s*['"][A-Za-z0-9_-]{16,}"#),
        ("access key assignment", r#"(?i)ACCESS[_-]?KEY\s*[=:]\s*['"][A-Za-z0-9_-]{8,}"#),
        ("private key assignment", r#"(?i)PRIVATE[_-]?KEY\s*[=:]\s*['"][A-Za-z0-9_-]{16,}"#),
    ]
    .into_iter()
    .map(|(reason, pattern)| {
        (
            reason,
            Regex::new(pattern).expect("secret pattern is valid"),
        )
    })
    .collect()
});

/// Result of one scan; `secure` is true exactly when nothing was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub secure: bool,
    pub findings: Vec<SecurityFinding>,
}

impl ScanOutcome {
    pub fn from_findings(findings: Vec<SecurityFinding>) -> Self {
        Self {
            secure: findings.is_empty(),
            findings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecretScanner {
    walker: DirectoryWalker,
    max_concurrent_reads: usize,
}

impl SecretScanner {
    pub fn new(walker: DirectoryWalker, max_concurrent_reads: usize) -> Self {
        Self {
            walker,
            max_concurrent_reads,
        }
    }

    /// Scan every inspectable file under `root`
    ///
    /// Each file contributes at most one finding. Findings are sorted by file
    /// so repeated scans of the same tree compare equal.
    pub async fn scan(&self, root: &Path) -> ScanOutcome {
        let files = self.walker.walk(root, Some(&is_inspectable));
        debug!(root = %root.display(), candidates = files.len(), "Scanning for secrets");

        let results = process_concurrently(files, self.max_concurrent_reads, |file| {
            let path = root.join(&file.relative_path);
            async move {
                // Invalid UTF-8 is replaced, not rejected, so a stray byte cannot hide a key
                let bytes = match tokio::fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(file = %file.relative_path, error = %e, "Skipping file during secret scan");
                        return None;
                    }
                };
                scan_content(&String::from_utf8_lossy(&bytes)).map(|reason| SecurityFinding {
                    file: file.relative_path,
                    reason: reason.to_string(),
                })
            }
        })
        .await;

        let mut findings: Vec<SecurityFinding> = results.into_iter().flatten().collect();
        findings.sort();

        for finding in &findings {
            warn!(file = %finding.file, reason = %finding.reason, "Potential secret exposure");
        }
        info!(
            root = %root.display(),
            findings = findings.len(),
            "Secret scan finished"
        );

        ScanOutcome::from_findings(findings)
    }
}

/// Reason of the first pattern matching `content`
pub fn scan_content(content: &str) -> Option<&'static str> {
    SECRET_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(content))
        .map(|(reason, _)| *reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> SecretScanner {
        SecretScanner::new(DirectoryWalker::default(), 4)
    }

    #[test]
    fn detects_quoted_credentials() {
        assert_eq!(
            scan_content(r#"const API_KEY = "sk_live_abcdefgh12345678";"#),
            Some("API key assignment")
        );
        assert_eq!(
            scan_content("client_secret: 'hunter2hunter2'"),
            Some("secret assignment")
        );
        assert_eq!(
            scan_content(r#"aws_access_key = "AKIAABCD""#),
            Some("access key assignment")
        );
    }

    #[test]
    fn ignores_references_and_short_literals() {
        assert_eq!(scan_content("const apiKey = process.env.API_KEY;"), None);
        assert_eq!(scan_content(r#"API_KEY = "short""#), None);
        assert_eq!(scan_content("TOKEN = abcdefghijklmnopqrstuvwxyz"), None);
    }

    #[tokio::test]
    async fn env_files_and_readme_are_exempt() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let leak = r#"API_KEY="abcdefghijklmnop1234""#;
        fs::write(root.join(".env"), leak).unwrap();
        fs::write(root.join(".env.production"), leak).unwrap();
        fs::write(root.join("local.env"), leak).unwrap();
        fs::write(root.join("README.md"), leak).unwrap();
        fs::write(root.join("notes.txt"), leak).unwrap();

        let outcome = scanner().scan(root).await;
        assert!(outcome.secure);
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn one_finding_per_file_sorted_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(
            root.join("src/z.js"),
            "const SECRET = 'abcdefghij';\nconst TOKEN = 'abcdefghijklmnopqrst';",
        )
        .unwrap();
        fs::write(root.join("settings.yaml"), "token: \"abcdefghijklmnopqrst\"").unwrap();
        fs::write(
            root.join("node_modules/pkg/index.js"),
            r#"const API_KEY = "abcdefghijklmnop1234";"#,
        )
        .unwrap();

        let outcome = scanner().scan(root).await;
        assert!(!outcome.secure);
        let files: Vec<&str> = outcome.findings.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(files, vec!["settings.yaml", "src/z.js"]);
        assert_eq!(outcome.findings[1].reason, "secret assignment");
    }

    #[tokio::test]
    async fn keys_in_non_utf8_files_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let mut content = b"// caf\xe9 config\n".to_vec();
        content.extend_from_slice(br#"const API_KEY = "sk_live_abcdefgh12345678";"#);
        fs::write(root.join("config.js"), content).unwrap();
        fs::write(root.join("blob.js"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let outcome = scanner().scan(root).await;
        assert!(!outcome.secure);
        assert_eq!(
            outcome.findings,
            vec![SecurityFinding {
                file: "config.js".to_string(),
                reason: "API key assignment".to_string(),
            }]
        );
    }
}
