//! Rendering backends.
//!
//! The document assembler only talks to the traits defined here, so the
//! template engine, the PDF converter and the merger can each be swapped out
//! (tests use in-memory fakes).

pub mod merge;
pub mod pdf;
pub mod qr;
pub mod template;

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;

pub use merge::LopdfMerger;
pub use pdf::{PageGeometry, Wkhtmltopdf};
pub use qr::qr_data_uri;
pub use template::TemplateStore;

/// Turns a named template and a context into markup.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `context`.
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Turns markup into a PDF file.
pub trait PdfBackend: Send + Sync {
    /// Write `html` as a PDF at `output` using the given page geometry.
    fn render_pdf(&self, html: &str, geometry: &PageGeometry, output: &Path) -> Result<()>;
}

/// Concatenates existing PDF files.
pub trait PdfMerger {
    /// Merge `inputs` in order into `output`.
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}
