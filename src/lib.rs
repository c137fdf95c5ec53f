//! PDF Joiner Library
//!
//! Keep an ordered list of PDF files, reorder it, and join the files into a
//! single document. This library provides:
//! - An ordered, duplicate-free file list with bounds-checked reordering
//! - A session layer that drives the list from a front end
//! - A lopdf-backed writer that concatenates documents in list order
//! - Metadata extraction (page counts, title, author)
//!
//! # Example
//!
//! ```no_run
//! use pdf_joiner::list::FileList;
//! use pdf_joiner::pdf::LopdfWriter;
//! use std::path::Path;
//!
//! let mut list = FileList::new();
//! list.add(["2. advanced.pdf", "1. intro.pdf"]);
//! list.move_up(1);
//!
//! let mut writer = LopdfWriter::default();
//! list.merge(Path::new("merged.pdf"), &mut writer).expect("Failed to merge PDFs");
//! assert!(list.is_empty());
//! ```

pub mod error;
pub mod inputs;
pub mod list;
pub mod logging;
pub mod pdf;
pub mod session;
pub mod shell;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use error::{Error, Result};
pub use list::FileList;
pub use session::{Feedback, ListDisplay, Session};
