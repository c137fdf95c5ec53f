//! Ordered file list backing the reorder/merge workflow
//!
//! The list order is the merge order. Paths are unique; mutation requests
//! with an out-of-range index are rejected with `false` and leave the list
//! untouched.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::error::{Error, Result};
use crate::pdf::{PdfWriter, WriterGuard};

/// Minimum number of entries a merge needs
pub const MIN_MERGE_FILES: usize = 2;

/// Ordered, duplicate-free list of PDF paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    entries: Vec<PathBuf>,
}

impl FileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every non-empty path not already in the list, in the given order.
    ///
    /// Returns how many paths were actually added.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.into();
            if path.as_os_str().is_empty() || self.contains(&path) {
                continue;
            }
            debug!(path = %path.display(), "added entry");
            self.entries.push(path);
            added += 1;
        }
        added
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let removed = self.entries.remove(index);
        debug!(index, path = %removed.display(), "removed entry");
        true
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.entries.swap(index - 1, index);
        debug!(from = index, to = index - 1, "moved entry up");
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, index + 1);
        debug!(from = index, to = index + 1, "moved entry down");
        true
    }

    /// Base names of the entries in merge order, for display.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|path| match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => path.to_string_lossy().into_owned(),
            })
            .collect()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| entry == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Hand every entry to `writer` in order and save the result to `destination`.
    ///
    /// Fails with [`Error::NotEnoughFiles`] before touching the writer when
    /// the list has fewer than two entries. Writer failures come back as
    /// [`Error::Merge`]. The writer is closed on every path, and the list is
    /// only cleared when the merge succeeds.
    pub fn merge<W>(&mut self, destination: &Path, writer: &mut W) -> Result<()>
    where
        W: PdfWriter + ?Sized,
    {
        if self.entries.len() < MIN_MERGE_FILES {
            return Err(Error::NotEnoughFiles {
                count: self.entries.len(),
            });
        }

        info!(
            files = self.entries.len(),
            output = %destination.display(),
            "merging"
        );

        let outcome = {
            let mut guard = WriterGuard::new(writer);
            self.entries
                .iter()
                .try_for_each(|path| guard.append(path))
                .and_then(|()| guard.write(destination))
        };

        match outcome {
            Ok(()) => {
                self.entries.clear();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "merge failed, keeping file list");
                Err(Error::merge(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingWriter, WriterCall};

    fn list_of(paths: &[&str]) -> FileList {
        let mut list = FileList::new();
        list.add(paths.iter().copied());
        list
    }

    fn as_strs(list: &FileList) -> Vec<&str> {
        list.paths().iter().map(|p| p.to_str().unwrap()).collect()
    }

    #[test]
    fn test_add_skips_duplicates() {
        let mut list = FileList::new();
        let added = list.add(["a.pdf", "a.pdf", "b.pdf"]);
        assert_eq!(added, 2);
        assert_eq!(as_strs(&list), vec!["a.pdf", "b.pdf"]);

        assert_eq!(list.add(["b.pdf", "c.pdf", "a.pdf"]), 1);
        assert_eq!(as_strs(&list), vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_add_ignores_empty_paths() {
        let mut list = FileList::new();
        assert_eq!(list.add([""]), 0);
        assert_eq!(list.add(Vec::<PathBuf>::new()), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_bounds() {
        let mut list = list_of(&["a.pdf", "b.pdf", "c.pdf"]);
        assert!(!list.remove(3));
        assert!(!list.remove(usize::MAX));
        assert_eq!(list.len(), 3);

        assert!(list.remove(1));
        assert_eq!(as_strs(&list), vec!["a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_move_up() {
        let mut list = list_of(&["a.pdf", "b.pdf", "c.pdf"]);
        assert!(!list.move_up(0));
        assert!(!list.move_up(3));
        assert_eq!(as_strs(&list), vec!["a.pdf", "b.pdf", "c.pdf"]);

        assert!(list.move_up(2));
        assert_eq!(as_strs(&list), vec!["a.pdf", "c.pdf", "b.pdf"]);
    }

    #[test]
    fn test_move_down() {
        let mut list = list_of(&["a.pdf", "b.pdf", "c.pdf"]);
        assert!(!list.move_down(2));
        assert!(!list.move_down(7));
        assert!(!FileList::new().move_down(0));

        assert!(list.move_down(0));
        assert_eq!(as_strs(&list), vec!["b.pdf", "a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_move_up_then_down_restores_order() {
        let original = list_of(&["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
        for k in 1..original.len() {
            let mut list = original.clone();
            assert!(list.move_up(k));
            assert!(list.move_down(k - 1));
            assert_eq!(list, original);
        }
    }

    #[test]
    fn test_names_are_base_names() {
        let list = list_of(&["/a/b/doc1.pdf", "/c/doc2.pdf"]);
        assert_eq!(list.names(), vec!["doc1.pdf", "doc2.pdf"]);
    }

    #[test]
    fn test_same_base_name_stays_distinct() {
        let list = list_of(&["/one/report.pdf", "/two/report.pdf"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.names(), vec!["report.pdf", "report.pdf"]);
    }

    #[test]
    fn test_merge_requires_two_files() {
        for paths in [&[][..], &["only.pdf"][..]] {
            let mut list = list_of(paths);
            let mut writer = RecordingWriter::default();

            let err = list.merge(Path::new("out.pdf"), &mut writer).unwrap_err();
            assert!(matches!(err, Error::NotEnoughFiles { count } if count == paths.len()));
            assert!(writer.calls.is_empty());
            assert_eq!(list.len(), paths.len());
        }
    }

    #[test]
    fn test_merge_success_appends_in_order_and_clears() {
        let mut list = list_of(&["x.pdf", "y.pdf"]);
        let mut writer = RecordingWriter::default();

        list.merge(Path::new("out.pdf"), &mut writer).unwrap();

        assert_eq!(
            writer.calls,
            vec![
                WriterCall::Append("x.pdf".into()),
                WriterCall::Append("y.pdf".into()),
                WriterCall::Write("out.pdf".into()),
                WriterCall::Close,
            ]
        );
        assert!(list.is_empty());
    }

    #[test]
    fn test_merge_failure_closes_writer_and_keeps_list() {
        let mut list = list_of(&["x.pdf", "y.pdf"]);
        let mut writer = RecordingWriter::failing_append(1);

        let err = list.merge(Path::new("out.pdf"), &mut writer).unwrap_err();

        assert!(matches!(err, Error::Merge { .. }));
        assert!(err.to_string().contains("y.pdf"), "got: {}", err);
        assert_eq!(writer.calls.last(), Some(&WriterCall::Close));
        assert!(!writer.calls.iter().any(|c| matches!(c, WriterCall::Write(_))));
        assert_eq!(as_strs(&list), vec!["x.pdf", "y.pdf"]);
    }

    #[test]
    fn test_merge_write_failure_keeps_list() {
        let mut list = list_of(&["x.pdf", "y.pdf", "z.pdf"]);
        let mut writer = RecordingWriter::failing_write();

        assert!(list.merge(Path::new("/readonly/out.pdf"), &mut writer).is_err());
        assert_eq!(writer.calls.last(), Some(&WriterCall::Close));
        assert_eq!(list.len(), 3);
    }
}
