//! Invoice model, error taxonomy and code lists.
//!
//! These types do not depend on any XML or PDF machinery; the `cii` and
//! `zugferd` modules produce them.

mod document_type;
mod error;
pub mod profile;
mod types;

pub use document_type::DocumentTypeCode;
pub use error::*;
pub use profile::{ProfileLevel, classify};
pub use types::*;
