//! PDF manipulation module

pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use merge::{
    merge_pdfs, LopdfWriter, MergeOptions, PdfWriter, WriterGuard, WriterOptions,
    SUPPORTED_PDF_VERSIONS,
};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
