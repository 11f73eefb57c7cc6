use thiserror::Error;

/// Errors that can occur while reading an invoice from XML or PDF.
///
/// Every variant that concerns a document location carries the absolute
/// query path, so the producer of a broken file can find the element
/// without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    /// A required element or attribute is absent.
    #[error("missing required field: {path}")]
    MissingRequiredField { path: String },

    /// A date is present but is not an 8-digit `YYYYMMDD` calendar date.
    #[error("malformed date at {path}: '{value}'")]
    MalformedDate { path: String, value: String },

    /// A numeric field is present but is not a decimal number.
    #[error("invalid decimal at {path}: '{value}'")]
    InvalidDecimal { path: String, value: String },

    /// A controlled code (document type, profile URN) is not in its code list.
    #[error("invalid {field}: '{value}'")]
    InvalidCode { field: String, value: String },

    /// The seller or buyer block is absent.
    #[error("missing {0} entity")]
    MissingEntity(String),

    /// No embedded file matched any of the known invoice filenames.
    #[error("no XML attachment found in PDF")]
    AttachmentNotFound,

    /// The input is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// The PDF could not be loaded or its attachment is malformed.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A query expression could not be parsed.
    #[error("invalid query '{0}'")]
    Query(String),
}

impl ExtractionError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingRequiredField { path: path.into() }
    }

    pub(crate) fn invalid_code(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCode {
            field: field.into(),
            value: value.into(),
        }
    }

    /// The path or field name the error refers to, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredField { path }
            | Self::MalformedDate { path, .. }
            | Self::InvalidDecimal { path, .. } => Some(path),
            Self::InvalidCode { field, .. } => Some(field),
            Self::MissingEntity(party) => Some(party),
            _ => None,
        }
    }
}
