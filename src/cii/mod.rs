//! CII (UN/CEFACT Cross Industry Invoice) reading.
//!
//! Factur-X, ZUGFeRD 2.x and the CII flavour of XRechnung share this
//! syntax. The document is parsed into an [`XmlDocument`], queried through
//! the typed accessors on [`XmlNode`], and projected into
//! [`InvoiceData`](crate::core::InvoiceData).
//!
//! # Example
//!
//! ```no_run
//! use einvoice::cii::XmlDocument;
//!
//! let xml = std::fs::read("factur-x.xml").unwrap();
//! let doc = XmlDocument::parse(&xml).unwrap();
//! let number = doc
//!     .root()
//!     .required_identifier("/rsm:CrossIndustryInvoice/rsm:ExchangedDocument/ram:ID/text()")
//!     .unwrap();
//! ```

mod extract;
mod invoice;
mod query;
mod tree;

pub use extract::{BUYER_TAG, DEFAULT_BUSINESS_PROCESS, SELLER_TAG, extract, extract_party};
pub use invoice::EInvoice;
pub use tree::{XmlDocument, XmlNode};

/// CII namespace URIs bound to the prefixes queries may use.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}
