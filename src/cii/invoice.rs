use std::sync::Arc;

use super::extract::extract;
use super::tree::XmlDocument;
use crate::core::*;

/// An invoice read from a CII document, optionally via a hybrid PDF.
///
/// The data is fixed once built. The parsed source documents are kept
/// alongside for raw re-queries; they are shared, never mutated.
#[derive(Clone)]
pub struct EInvoice {
    data: InvoiceData,
    xml: Option<Arc<XmlDocument>>,
    #[cfg(feature = "zugferd")]
    pdf: Option<Arc<lopdf::Document>>,
}

impl EInvoice {
    /// Wrap already-built data. No source documents are attached.
    pub fn new(data: InvoiceData) -> Self {
        Self {
            data,
            xml: None,
            #[cfg(feature = "zugferd")]
            pdf: None,
        }
    }

    /// Parse CII XML bytes and extract the invoice.
    ///
    /// ```no_run
    /// use einvoice::EInvoice;
    ///
    /// let xml = std::fs::read("factur-x.xml").unwrap();
    /// let invoice = EInvoice::from_xml(&xml).unwrap();
    /// println!("{} ({})", invoice.data().document_id, invoice.profile().unwrap());
    /// ```
    pub fn from_xml(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let doc = XmlDocument::parse(bytes)?;
        let data = extract(&doc)?;
        Ok(Self {
            xml: Some(Arc::new(doc)),
            ..Self::new(data)
        })
    }

    pub fn data(&self) -> &InvoiceData {
        &self.data
    }

    pub fn into_data(self) -> InvoiceData {
        self.data
    }

    /// Conformance level of `meta.specification_profile`, classified on access.
    pub fn profile(&self) -> Result<ProfileLevel, ExtractionError> {
        classify(&self.data.meta.specification_profile)
    }

    /// The XML document the invoice was read from.
    pub fn xml(&self) -> Option<&XmlDocument> {
        self.xml.as_deref()
    }

    /// The PDF the XML was embedded in, when read with [`EInvoice::from_pdf`].
    #[cfg(feature = "zugferd")]
    pub fn pdf(&self) -> Option<&lopdf::Document> {
        self.pdf.as_deref()
    }

    #[cfg(feature = "zugferd")]
    pub(crate) fn with_pdf(mut self, pdf: lopdf::Document) -> Self {
        self.pdf = Some(Arc::new(pdf));
        self
    }
}

impl std::fmt::Debug for EInvoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("EInvoice");
        s.field("data", &self.data);
        s.field("xml", &self.xml.is_some());
        #[cfg(feature = "zugferd")]
        s.field("pdf", &self.pdf.is_some());
        s.finish()
    }
}

impl From<EInvoice> for InvoiceData {
    fn from(invoice: EInvoice) -> Self {
        invoice.data
    }
}
