//! Orchestration between a front end and the file list
//!
//! A [`Session`] owns the [`FileList`] for one merge session. Front ends
//! forward user actions to it; it mutates the list, re-renders the base-name
//! projection through a [`ListDisplay`], and reports outcomes through a
//! [`Feedback`] sink. Nothing else touches the list directly.

use std::path::PathBuf;
use tracing::debug;
use crate::error::Error;
use crate::list::{FileList, MIN_MERGE_FILES};
use crate::pdf::PdfWriter;

pub const WARNING_TITLE: &str = "Warning";
pub const SUCCESS_TITLE: &str = "Success";
pub const MERGE_ERROR_TITLE: &str = "Merge Error";

const NOT_ENOUGH_FILES: &str = "At least two PDF files are required in the list.";

/// Renders the list projection
pub trait ListDisplay {
    /// Redraw the list; `selected` is the row to highlight, if any.
    fn render(&mut self, names: &[String], selected: Option<usize>);
}

/// Categorized user notifications
pub trait Feedback {
    fn warning(&mut self, title: &str, message: &str);
    fn success(&mut self, title: &str, message: &str);
    fn error(&mut self, title: &str, message: &str);
}

pub struct Session<V> {
    list: FileList,
    view: V,
}

impl<V: ListDisplay + Feedback> Session<V> {
    pub fn new(view: V) -> Self {
        Self {
            list: FileList::new(),
            view,
        }
    }

    pub fn list(&self) -> &FileList {
        &self.list
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Redraw without changing anything.
    pub fn refresh(&mut self) {
        self.render(None);
    }

    /// `None` means the selection was cancelled.
    pub fn add_files(&mut self, selection: Option<Vec<PathBuf>>) {
        let Some(paths) = selection else {
            debug!("file selection cancelled");
            return;
        };
        if paths.is_empty() {
            return;
        }
        self.list.add(paths);
        self.render(None);
    }

    pub fn remove(&mut self, index: usize) -> bool {
        let removed = self.list.remove(index);
        if removed {
            self.render(None);
        }
        removed
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        let moved = self.list.move_up(index);
        if moved {
            self.render(Some(index - 1));
        }
        moved
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        let moved = self.list.move_down(index);
        if moved {
            self.render(Some(index + 1));
        }
        moved
    }

    /// Drop every entry and start a new session.
    pub fn clear(&mut self) {
        self.list.clear();
        self.render(None);
    }

    /// Merge the list into `destination`. `None` means the save was cancelled.
    pub fn merge<W>(&mut self, destination: Option<PathBuf>, writer: &mut W)
    where
        W: PdfWriter + ?Sized,
    {
        if self.list.len() < MIN_MERGE_FILES {
            self.view.warning(WARNING_TITLE, NOT_ENOUGH_FILES);
            return;
        }

        let Some(destination) = destination else {
            debug!("save destination cancelled");
            return;
        };

        match self.list.merge(&destination, writer) {
            Ok(()) => {
                self.view.success(
                    SUCCESS_TITLE,
                    &format!("PDF merged and saved to:\n{}", destination.display()),
                );
                self.render(None);
            }
            Err(e @ Error::NotEnoughFiles { .. }) => {
                self.view.warning(WARNING_TITLE, &e.to_string());
            }
            Err(e) => {
                self.view.error(
                    MERGE_ERROR_TITLE,
                    &format!("An error occurred while merging the files: {}", e),
                );
            }
        }
    }

    fn render(&mut self, selected: Option<usize>) {
        let names = self.list.names();
        self.view.render(&names, selected);
    }
}
