//! Directory walker with directory-level pruning

use containerizer_core::FileRecord;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// "Keep this file" predicate applied to bare file names
pub type KeepFn<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// Recursive file walker that never descends into ignored directories
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    ignored: HashSet<String>,
}

impl DirectoryWalker {
    pub fn new<I, S>(ignore_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: ignore_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    /// Collect every regular file under `root` that passes `keep`
    ///
    /// Entries named in the ignore set are dropped together with their subtree.
    /// Symlinked directories are never descended into; a symlink to a regular
    /// file is listed like the file itself. Unreadable entries are skipped, so
    /// one bad directory never aborts the walk. Result order is unspecified.
    pub fn walk(&self, root: &Path, keep: Option<KeepFn<'_>>) -> Vec<FileRecord> {
        let mut files = Vec::new();

        let entries = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !self.is_ignored(&entry.file_name().to_string_lossy())
            });

        for result in entries {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        root = %root.display(),
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable entry"
                    );
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if let Some(keep) = keep {
                if !keep(&file_name) {
                    continue;
                }
            }

            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };

            files.push(FileRecord::new(to_slash_path(relative)));
        }

        debug!(root = %root.display(), files = files.len(), "Directory walk finished");
        files
    }
}

/// Regular file, or a symlink whose target is one
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

impl Default for DirectoryWalker {
    fn default() -> Self {
        Self::new(containerizer_core::DEFAULT_IGNORED_DIRS.iter().copied())
    }
}

/// Relative path with `/` separators regardless of platform
pub fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
