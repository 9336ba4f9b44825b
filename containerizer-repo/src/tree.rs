//! Text rendering of a repository's directory structure

use crate::walker::DirectoryWalker;
use containerizer_core::{repository_error, ContainerizerResult};
use std::fmt::Write;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Nesting beyond this depth is not rendered
const MAX_DEPTH: usize = 64;

/// Renders `tree`-style listings, skipping ignored entries
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    walker: DirectoryWalker,
}

impl TreeRenderer {
    pub fn new(walker: DirectoryWalker) -> Self {
        Self { walker }
    }

    /// Render the tree below `root`, one entry per line, siblings sorted by name
    ///
    /// Only an unreadable root is an error; unreadable subdirectories are
    /// rendered as leaves.
    pub fn render(&self, root: &Path) -> ContainerizerResult<String> {
        let entries = self.sorted_entries(root).map_err(|e| {
            repository_error!(
                format!("Failed to read directory {}: {}", root.display(), e),
                "tree_renderer",
                e
            )
        })?;

        let mut output = String::new();
        self.render_entries(entries, "", 0, &mut output);
        debug!(root = %root.display(), lines = output.lines().count(), "Directory tree rendered");
        Ok(output)
    }

    fn render_entries(&self, entries: Vec<fs::DirEntry>, prefix: &str, depth: usize, output: &mut String) {
        let count = entries.len();
        for (index, entry) in entries.into_iter().enumerate() {
            let is_last = index + 1 == count;
            let pointer = if is_last { LAST_BRANCH } else { BRANCH };
            let _ = writeln!(output, "{}{}{}", prefix, pointer, entry.file_name().to_string_lossy());

            // file_type does not follow symlinks, so linked directories stay leaves
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            if depth + 1 >= MAX_DEPTH {
                warn!(path = %entry.path().display(), "Directory nesting too deep, not descending");
                continue;
            }

            match self.sorted_entries(&entry.path()) {
                Ok(children) => {
                    let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
                    self.render_entries(children, &child_prefix, depth + 1, output);
                }
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unreadable directory");
                }
            }
        }
    }

    fn sorted_entries(&self, dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
        let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| !self.walker.is_ignored(&entry.file_name().to_string_lossy()))
            .collect();
        entries.sort_by_key(|entry| entry.file_name());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn renders_sorted_tree_without_ignored_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/utils")).unwrap();
        fs::create_dir_all(root.join("node_modules/express")).unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();
        fs::write(root.join("src/index.js"), "").unwrap();
        fs::write(root.join("src/utils/log.js"), "").unwrap();

        let tree = TreeRenderer::default().render(root).unwrap();

        let expected = "\
├── package.json
└── src
    ├── index.js
    └── utils
        └── log.js
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn pipes_continue_under_non_last_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/inner.txt"), "").unwrap();
        fs::write(root.join("b.txt"), "").unwrap();

        let tree = TreeRenderer::default().render(root).unwrap();
        assert_eq!(tree, "├── a\n│   └── inner.txt\n└── b.txt\n");
    }

    #[test]
    fn empty_and_missing_roots() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(TreeRenderer::default().render(temp_dir.path()).unwrap(), "");

        let missing = TreeRenderer::default().render(&temp_dir.path().join("missing"));
        assert!(missing.is_err());
    }
}
