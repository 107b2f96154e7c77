//! Minimal single-font PDF writer.
//!
//! Lays text out on A4 pages in millimetres with a cursor model (cells,
//! wrapped paragraphs, line feeds, automatic page breaks, a repeating page
//! header) and serializes to uncompressed PDF 1.3 using the built-in
//! Helvetica font with WinAnsi encoding.
pub mod document;
pub mod metrics;

pub use document::{to_latin1, Align, PdfDocument, TextRun};
