//! Hybrid PDF (Factur-X / ZUGFeRD / XRechnung-in-PDF) reading.
//!
//! A hybrid invoice is a PDF/A-3 document with the CII XML attached as an
//! embedded file. Producers have used several filenames over the years,
//! and some wrote them with octal escapes, so the lookup accepts all of
//! [`FACTURX_FILENAMES`].

mod attachment;

use lopdf::Document;

pub use attachment::{Attachment, find_attachment, is_invoice_filename};

use crate::cii::EInvoice;
use crate::core::ExtractionError;

/// The embedded XML filename per Factur-X 1.0+.
pub const FACTURX_FILENAME: &str = "factur-x.xml";

/// Every accepted embedded invoice filename.
pub const FACTURX_FILENAMES: &[&str] = &[
    FACTURX_FILENAME,
    r"factur\055x\056xml",
    "zugferd-invoice.xml",
    r"zugferd\055invoice\056xml",
    "ZUGFeRD-invoice.xml",
    r"ZUGFeRD\055invoice\056xml",
    "xrechnung.xml",
    r"xrechnung\056xml",
];

fn load(pdf_bytes: &[u8]) -> Result<Document, ExtractionError> {
    Document::load_mem(pdf_bytes)
        .map_err(|e| ExtractionError::Pdf(format!("failed to load PDF: {e}")))
}

/// Extract the raw invoice XML bytes from a PDF without parsing them.
pub fn extract_xml(pdf_bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let doc = load(pdf_bytes)?;
    Ok(find_attachment(&doc)?.content)
}

impl EInvoice {
    /// Read the invoice embedded in a hybrid PDF.
    ///
    /// Equivalent to [`EInvoice::from_xml`] on the attachment bytes; the
    /// loaded PDF stays available through [`EInvoice::pdf`].
    pub fn from_pdf(pdf_bytes: &[u8]) -> Result<Self, ExtractionError> {
        let doc = load(pdf_bytes)?;
        let attachment = find_attachment(&doc)?;
        let invoice = Self::from_xml(&attachment.content)?;
        Ok(invoice.with_pdf(doc))
    }
}
