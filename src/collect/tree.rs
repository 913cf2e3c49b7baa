//! Collector for drag-and-drop selections: a recursive tree of entry
//! handles whose directory children arrive in async batches.

use tracing::{debug, trace};

use crate::collect::{NormalizedSelection, DROPPED_FALLBACK_NAME};
use crate::common::{CancelFlag, FileEntry};
use crate::error::IngestError;
use crate::filter::PathFilter;
use crate::source::SourceEntry;

/// Walk every root depth-first and materialize surviving leaf files, in
/// traversal order, with their full accumulated relative paths.
///
/// The filter decision is made per node before any children are read, so a
/// skipped directory costs zero enumeration calls. Child batches are
/// drained until an empty batch comes back; one read is never trusted to
/// be complete.
pub async fn collect_tree(
    roots: Vec<Box<dyn SourceEntry>>,
    filter: &PathFilter,
    cancel: &CancelFlag,
) -> Result<NormalizedSelection, IngestError> {
    let folder_name = roots
        .iter()
        .find(|r| r.is_dir())
        .map(|r| r.name().to_string())
        .unwrap_or_else(|| DROPPED_FALLBACK_NAME.to_string());

    // Depth-first work stack. Roots and child batches are pushed in reverse
    // so the first entry of each level is processed first.
    let mut stack: Vec<(Box<dyn SourceEntry>, String)> = Vec::new();
    for root in roots.into_iter().rev() {
        stack.push((root, String::new()));
    }

    let mut entries = Vec::new();
    while let Some((mut node, base)) = stack.pop() {
        cancel.checkpoint()?;

        let path = if base.is_empty() {
            node.name().to_string()
        } else {
            format!("{}/{}", base, node.name())
        };

        if filter.skips_path(&path) {
            trace!(%path, "filtered, subtree not enumerated");
            continue;
        }

        if node.is_dir() {
            let mut children = Vec::new();
            loop {
                let batch = node.read_children().await?;
                if batch.is_empty() {
                    break;
                }
                children.extend(batch);
            }
            for child in children.into_iter().rev() {
                stack.push((child, path.clone()));
            }
        } else {
            let (content, size) = node.open_file().await?;
            entries.push(FileEntry {
                relative_path: path,
                size,
                content,
            });
        }
    }

    if entries.is_empty() {
        return Err(IngestError::NoSupportedFiles);
    }
    debug!(
        folder = %folder_name,
        files = entries.len(),
        "tree selection normalized"
    );
    Ok(NormalizedSelection {
        folder_name,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::common::FileContent;

    /// Scripted in-memory tree with configurable child-batch size and a
    /// probe counting `read_children` calls.
    struct MemEntry {
        name: String,
        children: Option<VecDeque<MemEntry>>,
        bytes: Vec<u8>,
        batch: usize,
        reads: Option<Arc<AtomicUsize>>,
    }

    impl MemEntry {
        fn file(name: &str, bytes: &[u8]) -> Self {
            Self {
                name: name.to_string(),
                children: None,
                bytes: bytes.to_vec(),
                batch: usize::MAX,
                reads: None,
            }
        }

        fn dir(name: &str, children: Vec<MemEntry>) -> Self {
            Self {
                name: name.to_string(),
                children: Some(children.into()),
                bytes: Vec::new(),
                batch: usize::MAX,
                reads: None,
            }
        }

        fn with_batch(mut self, batch: usize) -> Self {
            self.batch = batch;
            self
        }

        fn probed(mut self, reads: Arc<AtomicUsize>) -> Self {
            self.reads = Some(reads);
            self
        }
    }

    #[async_trait]
    impl SourceEntry for MemEntry {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_dir(&self) -> bool {
            self.children.is_some()
        }

        async fn read_children(&mut self) -> Result<Vec<Box<dyn SourceEntry>>, IngestError> {
            if let Some(reads) = &self.reads {
                reads.fetch_add(1, Ordering::Relaxed);
            }
            let Some(children) = self.children.as_mut() else {
                return Ok(Vec::new());
            };
            let take = self.batch.min(children.len());
            Ok(children
                .drain(..take)
                .map(|c| Box::new(c) as Box<dyn SourceEntry>)
                .collect())
        }

        async fn open_file(&self) -> Result<(FileContent, u64), IngestError> {
            Ok((
                FileContent::Bytes(self.bytes.clone()),
                self.bytes.len() as u64,
            ))
        }
    }

    fn roots(entries: Vec<MemEntry>) -> Vec<Box<dyn SourceEntry>> {
        entries
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn SourceEntry>)
            .collect()
    }

    #[tokio::test]
    async fn walks_depth_first_in_input_order() {
        let tree = MemEntry::dir(
            "export",
            vec![
                MemEntry::file("a.json", b"a"),
                MemEntry::dir(
                    "labs",
                    vec![
                        MemEntry::file("panel.xml", b"pp"),
                        MemEntry::file("culture.xml", b"ccc"),
                    ],
                ),
                MemEntry::file("z.txt", b"zzzz"),
            ],
        );

        let normalized = collect_tree(roots(vec![tree]), &PathFilter, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(normalized.folder_name, "export");
        let paths: Vec<&str> = normalized
            .entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec![
                "export/a.json",
                "export/labs/panel.xml",
                "export/labs/culture.xml",
                "export/z.txt",
            ]
        );
        assert_eq!(normalized.entries[1].size, 2);
    }

    #[tokio::test]
    async fn drains_every_child_batch_before_descending() {
        // Batch size 2 over 5 children forces three non-empty reads plus
        // the terminating empty one; losing any batch loses files.
        let children = (0..5)
            .map(|i| MemEntry::file(&format!("f{i}.bin"), b"x"))
            .collect();
        let tree = MemEntry::dir("export", children).with_batch(2);

        let normalized = collect_tree(roots(vec![tree]), &PathFilter, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(normalized.entries.len(), 5);
    }

    #[tokio::test]
    async fn filtered_directories_are_never_enumerated() {
        let reads = Arc::new(AtomicUsize::new(0));
        let hidden = MemEntry::dir(
            ".git",
            vec![MemEntry::file("HEAD", b"ref")],
        )
        .probed(reads.clone());
        let tree = MemEntry::dir("export", vec![hidden, MemEntry::file("a.json", b"{}")]);

        let normalized = collect_tree(roots(vec![tree]), &PathFilter, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(reads.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn folder_name_is_first_top_level_directory() {
        let selection = roots(vec![
            MemEntry::file("loose.txt", b"l"),
            MemEntry::dir("export", vec![MemEntry::file("a.json", b"{}")]),
            MemEntry::dir("other", vec![MemEntry::file("b.json", b"{}")]),
        ]);
        let normalized = collect_tree(selection, &PathFilter, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(normalized.folder_name, "export");
    }

    #[tokio::test]
    async fn loose_files_fall_back_to_the_dropped_folder_name() {
        let selection = roots(vec![
            MemEntry::file("one.txt", b"1"),
            MemEntry::file("two.txt", b"2"),
        ]);
        let normalized = collect_tree(selection, &PathFilter, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(normalized.folder_name, DROPPED_FALLBACK_NAME);
        assert_eq!(normalized.entries.len(), 2);
    }

    #[tokio::test]
    async fn empty_directories_contribute_nothing() {
        let tree = MemEntry::dir(
            "export",
            vec![
                MemEntry::dir("empty", Vec::new()),
                MemEntry::file("only.dat", b"0123456789"),
            ],
        );
        let normalized = collect_tree(roots(vec![tree]), &PathFilter, &CancelFlag::new())
            .await
            .unwrap();
        let paths: Vec<&str> = normalized
            .entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["export/only.dat"]);
    }

    #[tokio::test]
    async fn all_filtered_is_no_supported_files() {
        let tree = MemEntry::dir("export", vec![MemEntry::file(".DS_Store", b"junk")]);
        assert!(matches!(
            collect_tree(roots(vec![tree]), &PathFilter, &CancelFlag::new()).await,
            Err(IngestError::NoSupportedFiles)
        ));
    }

    #[tokio::test]
    async fn cancellation_stops_the_walk() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let tree = MemEntry::dir("export", vec![MemEntry::file("a.json", b"{}")]);
        assert!(matches!(
            collect_tree(roots(vec![tree]), &PathFilter, &cancel).await,
            Err(IngestError::Cancelled)
        ));
    }
}
