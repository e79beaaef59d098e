pub mod fdx;
pub mod html;
pub mod liner;
pub mod pdf;

use thiserror::Error;

/// Failure of a render call. Parsing is total; only writing the artifact
/// to the caller-supplied sink (or assembling it) can fail, and such a
/// failure is terminal for the call.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf generation error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("xml generation error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

pub use fdx::generate_fdx;
pub use html::{generate_html, HtmlOptions};
pub use pdf::generate_pdf;
