//! # einvoice
//!
//! Read structured electronic invoices (Factur-X, ZUGFeRD 2.x, XRechnung
//! in CII syntax) into a typed model, either from the bare XML or from a
//! hybrid PDF that carries the XML as an embedded file.
//!
//! All monetary values use [`rust_decimal::Decimal`]; amounts a document
//! may leave out are `Option<Decimal>`, so "not stated" is never confused
//! with zero.
//!
//! ## Quick Start
//!
//! ```no_run
//! use einvoice::{EInvoice, ProfileLevel};
//!
//! let pdf = std::fs::read("invoice.pdf").unwrap();
//! let invoice = EInvoice::from_pdf(&pdf).unwrap();
//!
//! let data = invoice.data();
//! println!("{} from {}", data.document_id, data.seller.name);
//! if invoice.profile().unwrap() >= ProfileLevel::Basic {
//!     for line in &data.transaction.as_ref().unwrap().positions {
//!         println!("{} x {}", line.quantity, line.name);
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice model, errors, profile and document type code lists |
//! | `cii` | CII XML parsing, queries and extraction (`EInvoice::from_xml`) |
//! | `zugferd` | Embedded XML lookup in hybrid PDFs (`EInvoice::from_pdf`) |
//! | `all` | Everything |
//!
//! All three are enabled by default.

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "cii")]
pub mod cii;

#[cfg(feature = "zugferd")]
pub mod zugferd;

#[cfg(feature = "cii")]
pub use cii::EInvoice;

#[cfg(feature = "core")]
pub use crate::core::{ExtractionError, InvoiceData, ProfileLevel};
