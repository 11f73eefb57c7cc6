use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::FACTURX_FILENAMES;
use crate::core::ExtractionError;

/// The embedded invoice XML found in a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Object id of the file specification dictionary.
    pub object_id: ObjectId,
    /// Declared filename, decoded.
    pub filename: String,
    /// Decoded stream content.
    pub content: Vec<u8>,
}

/// Locate the invoice XML among the PDF's file specifications.
///
/// Indirect objects are visited in ascending object id order; the first
/// dictionary whose `F` (or `UF`) name is a known invoice filename wins and
/// its `EF` stream is decoded. A malformed winning specification is an
/// error, the search does not fall through to later objects.
pub fn find_attachment(doc: &Document) -> Result<Attachment, ExtractionError> {
    for (&object_id, object) in &doc.objects {
        let Object::Dictionary(dict) = object else {
            continue;
        };
        let Some(filename) = declared_filename(doc, dict) else {
            continue;
        };
        if !is_invoice_filename(&filename) {
            trace!(?object_id, %filename, "skipping embedded file");
            continue;
        }

        let content = embedded_content(doc, dict).map_err(|e| {
            ExtractionError::Pdf(format!("malformed attachment '{filename}' in {object_id:?}: {e}"))
        })?;
        debug!(?object_id, %filename, bytes = content.len(), "found invoice attachment");

        return Ok(Attachment {
            object_id,
            filename,
            content,
        });
    }

    Err(ExtractionError::AttachmentNotFound)
}

/// Whether `name` is one of the known invoice filenames, in literal or
/// octal-escaped spelling.
pub fn is_invoice_filename(name: &str) -> bool {
    FACTURX_FILENAMES.contains(&name) || FACTURX_FILENAMES.contains(&unescape_octal(name).as_str())
}

/// First text-string filename among `F` and `UF`.
fn declared_filename(doc: &Document, dict: &Dictionary) -> Option<String> {
    [b"F".as_slice(), b"UF".as_slice()]
        .into_iter()
        .filter_map(|key| dict.get(key).ok())
        .filter_map(|obj| resolve_obj(doc, obj).ok())
        .filter_map(obj_to_string)
        .find(|name| is_invoice_filename(name))
        .or_else(|| {
            dict.get(b"F")
                .ok()
                .and_then(|obj| resolve_obj(doc, obj).ok())
                .and_then(obj_to_string)
        })
}

fn embedded_content(doc: &Document, filespec: &Dictionary) -> Result<Vec<u8>, String> {
    let ef_obj = filespec.get(b"EF").map_err(|e| e.to_string())?;
    let ef_dict = resolve_dict(doc, ef_obj)?;

    let f_obj = ef_dict
        .get(b"F")
        .or_else(|_| ef_dict.get(b"UF"))
        .map_err(|e| e.to_string())?;
    let stream = resolve_obj(doc, f_obj)?
        .as_stream()
        .map_err(|e| e.to_string())?;

    // decompressed_content() fails when no Filter is set, so unfiltered
    // streams are returned as stored.
    if stream.dict.has(b"Filter") {
        stream.decompressed_content().map_err(|e| e.to_string())
    } else {
        Ok(stream.content.clone())
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Dictionary, String> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).map_err(|e| e.to_string()),
        Object::Dictionary(d) => Ok(d),
        _ => Err("expected dictionary or reference".to_string()),
    }
}

fn resolve_obj<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, String> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).map_err(|e| e.to_string()),
        other => Ok(other),
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte order mark,
/// otherwise the bytes as (lossy) UTF-8.
fn obj_to_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

fn decode_text_string(bytes: &[u8]) -> String {
    let decoded = match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    };
    decoded.trim_end_matches('\0').to_string()
}

/// Replace `\ddd` octal escapes with the byte they denote.
fn unescape_octal(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let digits = bytes[i + 1..]
                .iter()
                .take(3)
                .take_while(|b| (b'0'..=b'7').contains(*b))
                .count();
            if digits > 0 {
                let value = bytes[i + 1..i + 1 + digits]
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                out.push((value & 0xFF) as u8);
                i += 1 + digits;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
