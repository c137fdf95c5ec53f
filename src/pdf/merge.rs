//! PDF merging functionality using lopdf
//!
//! Merging is split into a [`PdfWriter`] that queues source documents and
//! serializes them, and a [`WriterGuard`] that guarantees the writer is
//! closed on every exit path.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info};
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic Parent chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Header versions the writer will emit
pub const SUPPORTED_PDF_VERSIONS: [&str; 5] = ["1.4", "1.5", "1.6", "1.7", "2.0"];

/// Byte-level writer that concatenates source documents in append order
pub trait PdfWriter {
    /// Queue the pages of the document at `path` after everything appended so far
    fn append(&mut self, path: &Path) -> Result<()>;

    /// Serialize the queued documents to `destination`
    fn write(&mut self, destination: &Path) -> Result<()>;

    /// Release everything the writer holds. Must be safe to call more than once.
    fn close(&mut self);
}

/// Scoped handle that closes the wrapped writer when dropped
pub struct WriterGuard<'a, W: PdfWriter + ?Sized> {
    writer: &'a mut W,
}

impl<'a, W: PdfWriter + ?Sized> WriterGuard<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<W: PdfWriter + ?Sized> Deref for WriterGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        &*self.writer
    }
}

impl<W: PdfWriter + ?Sized> DerefMut for WriterGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut *self.writer
    }
}

impl<W: PdfWriter + ?Sized> Drop for WriterGuard<'_, W> {
    fn drop(&mut self) {
        self.writer.close();
    }
}

/// Output settings for [`LopdfWriter`]
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// PDF version written into the header of the merged file
    pub pdf_version: String,
    /// Compress streams before saving
    pub compress: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            pdf_version: "1.5".to_string(),
            compress: true,
        }
    }
}

/// [`PdfWriter`] backed by lopdf
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
#[derive(Debug, Default)]
pub struct LopdfWriter {
    options: WriterOptions,
    documents: Vec<(PathBuf, Document)>,
}

impl LopdfWriter {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            options,
            documents: Vec::new(),
        }
    }

    /// Number of documents currently queued
    pub fn queued(&self) -> usize {
        self.documents.len()
    }
}

impl PdfWriter for LopdfWriter {
    fn append(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let mut doc = Document::load(path)?;

        // Validate document has pages
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(Error::EmptyPdf(path.to_path_buf()));
        }

        // The source page tree is discarded on write, so pull inherited
        // attributes down onto the pages first
        for page_id in page_ids {
            flatten_inherited_attributes(&mut doc, page_id)?;
        }

        debug!(path = %path.display(), pages = doc.get_pages().len(), "queued document");
        self.documents.push((path.to_path_buf(), doc));
        Ok(())
    }

    fn write(&mut self, destination: &Path) -> Result<()> {
        if !SUPPORTED_PDF_VERSIONS.contains(&self.options.pdf_version.as_str()) {
            return Err(Error::General(format!(
                "Unsupported PDF version: {} (expected one of {})",
                self.options.pdf_version,
                SUPPORTED_PDF_VERSIONS.join(", ")
            )));
        }
        if self.documents.is_empty() {
            return Err(Error::General("No input files provided".to_string()));
        }

        let documents = std::mem::take(&mut self.documents);
        let source_count = documents.len();

        // Define a starting max_id for merged document
        let mut max_id = 1;
        let mut page_ids: Vec<ObjectId> = Vec::new();
        let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

        for (path, mut doc) in documents {
            // Renumber objects in this document to avoid conflicts
            debug!(path = %path.display(), first_id = max_id, "renumbering objects");
            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            page_ids.extend(doc.get_pages().into_values());
            objects.extend(doc.objects);
        }

        let mut merged_doc = Document::with_version(self.options.pdf_version.as_str());
        merged_doc.objects.extend(objects);

        // new_object_id() must hand out ids above everything copied in
        merged_doc.max_id = max_id - 1;

        let pages_id = merged_doc.new_object_id();
        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(page_ids.len() as i64));
        pages_object.set("Kids", Object::Array(kids));

        let catalog_id = merged_doc.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));

        merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
        merged_doc.trailer.set("Root", Object::Reference(catalog_id));

        for &page_id in &page_ids {
            if let Ok(Object::Dictionary(dict)) = merged_doc.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        if self.options.compress {
            merged_doc.compress();
        }
        merged_doc.save(destination)?;

        info!(
            sources = source_count,
            pages = page_ids.len(),
            output = %destination.display(),
            "wrote merged PDF"
        );
        Ok(())
    }

    fn close(&mut self) {
        if !self.documents.is_empty() {
            debug!(dropped = self.documents.len(), "closing writer with queued documents");
        }
        self.documents.clear();
    }
}

/// Copy attributes the page inherits from its ancestors onto the page itself
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;

        while let Some(parent_id) = parent {
            if missing.is_empty() || depth >= MAX_TREE_DEPTH {
                break;
            }
            let Ok(node) = doc.get_dictionary(parent_id) else {
                break;
            };

            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((key.to_vec(), value.clone()));
                    false
                }
                Err(_) => true,
            });

            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

/// Options for merging PDFs in one call
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
    /// Output settings
    pub writer: WriterOptions,
}

/// Merge multiple PDF files into a single PDF
///
/// # Example
///
/// ```no_run
/// use pdf_joiner::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("1. first.pdf"),
///         PathBuf::from("2. second.pdf"),
///     ],
///     output_path: PathBuf::from("merged.pdf"),
///     ..Default::default()
/// };
///
/// merge_pdfs(&options).expect("Failed to merge");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<()> {
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    // Validate all input files exist
    for path in &options.input_paths {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let mut writer = LopdfWriter::new(options.writer.clone());
    let mut guard = WriterGuard::new(&mut writer);
    for path in &options.input_paths {
        guard.append(path)?;
    }
    guard.write(&options.output_path)
}
