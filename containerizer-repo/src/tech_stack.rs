//! Line-count based tech stack aggregation

use crate::languages::extension_of;
use crate::walker::DirectoryWalker;
use containerizer_core::{process_concurrently, TechStackStat};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Counts source lines per allow-listed extension
#[derive(Debug, Clone)]
pub struct TechStackAggregator {
    walker: DirectoryWalker,
    allowed_extensions: HashSet<String>,
    max_concurrent_reads: usize,
}

impl TechStackAggregator {
    pub fn new<I, S>(walker: DirectoryWalker, allowed_extensions: I, max_concurrent_reads: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            walker,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_ascii_lowercase())
                .collect(),
            max_concurrent_reads,
        }
    }

    /// Total lines per extension across the pruned tree
    ///
    /// Unreadable files are skipped; an empty map means nothing matched.
    pub async fn count_lines(&self, root: &Path) -> BTreeMap<String, usize> {
        let keep = |name: &str| {
            extension_of(name)
                .map(|ext| self.allowed_extensions.contains(&ext))
                .unwrap_or(false)
        };
        let files = self.walker.walk(root, Some(&keep));

        let counted = process_concurrently(files, self.max_concurrent_reads, |file| {
            let path = root.join(&file.relative_path);
            async move {
                let extension = extension_of(file.file_name())?;
                match tokio::fs::read(&path).await {
                    Ok(bytes) => Some((extension, count_lines_in(&bytes))),
                    Err(e) => {
                        warn!(file = %file.relative_path, error = %e, "Skipping unreadable file");
                        None
                    }
                }
            }
        })
        .await;

        let mut totals = BTreeMap::new();
        for (extension, lines) in counted.into_iter().flatten() {
            *totals.entry(extension).or_insert(0) += lines;
        }

        debug!(root = %root.display(), extensions = totals.len(), "Tech stack counted");
        totals
    }
}

/// Lines as produced by splitting the content on line breaks
pub fn count_lines_in(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| **b == b'\n').count() + 1
}

/// Order tech stack totals by line count, largest first
pub fn rank_tech_stack(totals: BTreeMap<String, usize>) -> Vec<TechStackStat> {
    let mut stats: Vec<TechStackStat> = totals
        .into_iter()
        .map(|(extension, line_count)| TechStackStat {
            extension,
            line_count,
        })
        .collect();
    // BTreeMap order already sorts by extension, and the sort is stable
    stats.sort_by(|a, b| b.line_count.cmp(&a.line_count));
    stats
}
